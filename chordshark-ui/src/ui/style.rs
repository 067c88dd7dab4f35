use ratatui::style::{Color as RatatuiColor, Modifier, Style as RatatuiStyle};

/// RGB color. Construct with `Color::new(r, g, b)` or use named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const DARK_GRAY: Color = Color::new(100, 100, 100);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const LIME: Color = Color::new(50, 205, 50);
    pub const GOLD: Color = Color::new(255, 215, 0);
    pub const CORAL: Color = Color::new(255, 127, 80);
    pub const SKY_BLUE: Color = Color::new(135, 206, 235);
    pub const MIDI_COLOR: Color = Color::new(255, 100, 160);

    // Recognition states
    pub const LISTENING: Color = Color::SKY_BLUE;
    pub const SUCCESS: Color = Color::LIME;
    pub const MISMATCH: Color = Color::CORAL;
}

impl From<Color> for RatatuiColor {
    fn from(c: Color) -> Self {
        RatatuiColor::Rgb(c.r, c.g, c.b)
    }
}

/// Text style: foreground and bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Color,
    pub bold: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: Color::WHITE,
            bold: false,
        }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl From<Style> for RatatuiStyle {
    fn from(s: Style) -> Self {
        let mut style = RatatuiStyle::default().fg(s.fg.into());
        if s.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }
}
