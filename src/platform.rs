use anyhow::Result;

mod buffer;
mod crossterm_term;
mod scripted;

pub use buffer::{Area, Cell, ScreenBuffer};
pub use crossterm_term::CrosstermTerminal;
pub use scripted::ScriptedTerminal;

/// The 16 classic text-mode colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Black,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Brown,
    LightGray,
    DarkGray,
    LightBlue,
    LightGreen,
    LightCyan,
    LightRed,
    LightMagenta,
    Yellow,
    White,
}

/// Discrete key codes produced by the keyboard driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Up,
    Down,
    Space,
    Enter,
    Char(char),
    Other,
}

impl Key {
    /// Parses a key name as used by key scripts (`up`, `esc`, `x`, ...).
    pub fn from_name(name: &str) -> Option<Key> {
        let name = name.trim();
        let key = match name.to_ascii_lowercase().as_str() {
            "esc" | "escape" => Key::Escape,
            "up" => Key::Up,
            "down" => Key::Down,
            "space" => Key::Space,
            "enter" | "return" => Key::Enter,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Character-cell console the menus are drawn on.
///
/// Drawing calls only touch a shadow buffer and cannot fail; output is pushed
/// to the device when the next key is read.
pub trait Terminal {
    fn num_rows(&self) -> u16;
    fn num_cols(&self) -> u16;
    fn set_attr(&mut self, fg: Color, bg: Color, blink: bool);
    fn put_char(&mut self, x: u16, y: u16, ch: char);

    /// Draws a framed, filled window and returns the cells it covered.
    #[allow(clippy::too_many_arguments)]
    fn draw_window(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        border: Color,
        fill: Color,
        title: Option<&str>,
    ) -> Area;

    fn restore(&mut self, area: &Area, x: u16, y: u16);
    fn release(&mut self, area: Area);

    /// Discards keys typed before the menu appeared.
    fn flush_pending_keys(&mut self) -> Result<()>;

    /// Blocks until the next key press.
    fn read_key(&mut self) -> Result<Key>;

    fn put_str(&mut self, x: u16, y: u16, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            let Ok(i) = u16::try_from(i) else {
                break;
            };
            self.put_char(x.saturating_add(i), y, ch);
        }
    }

    fn hline(&mut self, x: u16, y: u16, ch: char, len: u16) {
        for i in 0..len {
            self.put_char(x.saturating_add(i), y, ch);
        }
    }
}
