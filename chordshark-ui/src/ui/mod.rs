pub mod input;
pub mod ratatui_impl;
pub mod style;

pub use input::{AppEvent, InputEvent, InputSource, KeyCode, Modifiers};
pub use ratatui_impl::RatatuiBackend;
pub use style::{Color, Style};
