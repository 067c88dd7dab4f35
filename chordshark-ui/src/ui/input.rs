use std::time::Duration;

/// Top-level input event: keyboard or resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Key(InputEvent),
    Resize(u16, u16),
}

/// Key codes for keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Escape,
    Left,
    Right,
}

/// Modifier key state. Only Ctrl matters (Ctrl-C quits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    pub is_repeat: bool,
}

impl InputEvent {
    #[cfg(test)]
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
            is_repeat: false,
        }
    }
}

/// Something that can be polled for input events
pub trait InputSource {
    /// Wait up to `timeout` for the next event.
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent>;
}
