use std::collections::VecDeque;

use anyhow::{anyhow, Result};

use super::{Area, Color, Key, ScreenBuffer, Terminal};

/// Headless terminal that replays a fixed key script.
///
/// Keys in the script count as typed after any flush, so
/// `flush_pending_keys` never discards them.
#[derive(Debug, Clone)]
pub struct ScriptedTerminal {
    screen: ScreenBuffer,
    keys: VecDeque<Key>,
    open_windows: usize,
    max_depth: usize,
    restores: usize,
    releases: usize,
    flushes: usize,
    keys_read: usize,
    last_frame: String,
}

impl ScriptedTerminal {
    pub fn new(cols: u16, rows: u16, keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            screen: ScreenBuffer::new(cols, rows),
            keys: keys.into_iter().collect(),
            open_windows: 0,
            max_depth: 0,
            restores: 0,
            releases: 0,
            flushes: 0,
            keys_read: 0,
            last_frame: String::new(),
        }
    }

    /// Parses a comma separated key script such as `down,down,enter,esc`.
    pub fn parse_script(script: &str) -> Result<Vec<Key>> {
        script
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| Key::from_name(s).ok_or_else(|| anyhow!("Unknown key '{}' in script", s.trim())))
            .collect()
    }

    pub fn screen(&self) -> &ScreenBuffer {
        &self.screen
    }

    /// Windows drawn but not yet released.
    pub fn open_windows(&self) -> usize {
        self.open_windows
    }

    /// Deepest window nesting seen so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn restores(&self) -> usize {
        self.restores
    }

    pub fn releases(&self) -> usize {
        self.releases
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn keys_read(&self) -> usize {
        self.keys_read
    }

    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }

    /// Screen contents as they were when the most recent key was read.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }
}

impl Terminal for ScriptedTerminal {
    fn num_rows(&self) -> u16 {
        self.screen.rows()
    }

    fn num_cols(&self) -> u16 {
        self.screen.cols()
    }

    fn set_attr(&mut self, fg: Color, bg: Color, blink: bool) {
        self.screen.set_attr(fg, bg, blink);
    }

    fn put_char(&mut self, x: u16, y: u16, ch: char) {
        self.screen.put_char(x, y, ch);
    }

    fn draw_window(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        border: Color,
        fill: Color,
        title: Option<&str>,
    ) -> Area {
        self.open_windows += 1;
        self.max_depth = self.max_depth.max(self.open_windows);
        self.screen
            .draw_window(x, y, width, height, border, fill, title)
    }

    fn restore(&mut self, area: &Area, x: u16, y: u16) {
        self.restores += 1;
        self.screen.restore(area, x, y);
    }

    fn release(&mut self, _area: Area) {
        self.releases += 1;
        self.open_windows = self.open_windows.saturating_sub(1);
    }

    fn flush_pending_keys(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn read_key(&mut self) -> Result<Key> {
        self.last_frame = self.screen.dump();
        let key = self
            .keys
            .pop_front()
            .ok_or_else(|| anyhow!("key script exhausted after {} keys", self.keys_read))?;
        self.keys_read += 1;
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_parses_names_and_characters() {
        let keys = ScriptedTerminal::parse_script("down, Up,enter,space,esc,q,").unwrap();
        assert_eq!(
            keys,
            vec![Key::Down, Key::Up, Key::Enter, Key::Space, Key::Escape, Key::Char('q')]
        );
        assert!(ScriptedTerminal::parse_script("down,pagedown").is_err());
    }

    #[test]
    fn exhausted_script_is_an_error() {
        let mut term = ScriptedTerminal::new(10, 5, [Key::Escape]);
        assert_eq!(term.read_key().unwrap(), Key::Escape);
        let err = term.read_key().unwrap_err();
        assert!(err.to_string().contains("exhausted after 1 keys"));
    }

    #[test]
    fn window_bookkeeping() {
        let mut term = ScriptedTerminal::new(20, 10, []);
        let outer = term.draw_window(0, 0, 10, 5, Color::White, Color::Blue, None);
        let inner = term.draw_window(2, 2, 6, 3, Color::White, Color::Blue, None);
        assert_eq!(term.open_windows(), 2);
        term.restore(&inner, 2, 2);
        term.release(inner);
        term.restore(&outer, 0, 0);
        term.release(outer);
        assert_eq!(term.open_windows(), 0);
        assert_eq!(term.max_depth(), 2);
        assert_eq!((term.restores(), term.releases()), (2, 2));
    }
}
