use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{self, Attribute},
    terminal,
};
use tracing::debug;

use super::{Area, Color, Key, ScreenBuffer, Terminal};

/// Real console backend. Takes over the terminal (raw mode, alternate
/// screen) for its lifetime and hands it back on drop.
pub struct CrosstermTerminal {
    out: Stdout,
    screen: ScreenBuffer,
}

impl CrosstermTerminal {
    pub fn new() -> Result<Self> {
        let (cols, rows) = terminal::size().context("query terminal size")?;
        terminal::enable_raw_mode().context("enable raw mode")?;
        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)
            .context("enter alternate screen")?;
        debug!(cols, rows, "terminal acquired");
        Ok(Self {
            out,
            screen: ScreenBuffer::new(cols, rows),
        })
    }

    fn present(&mut self) -> Result<()> {
        let mut last: Option<(Color, Color, bool)> = None;
        for (x, y, cell) in self.screen.take_dirty() {
            queue!(self.out, cursor::MoveTo(x, y))?;
            let attr = (cell.fg, cell.bg, cell.blink);
            if last != Some(attr) {
                queue!(
                    self.out,
                    style::SetAttribute(Attribute::Reset),
                    style::SetForegroundColor(to_crossterm(cell.fg)),
                    style::SetBackgroundColor(to_crossterm(cell.bg)),
                )?;
                if cell.blink {
                    queue!(self.out, style::SetAttribute(Attribute::SlowBlink))?;
                }
                last = Some(attr);
            }
            queue!(self.out, style::Print(cell.ch))?;
        }
        self.out.flush().context("flush terminal output")?;
        Ok(())
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

impl Terminal for CrosstermTerminal {
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
        self.screen
            .draw_window(x, y, width, height, border, fill, title)
    }

    fn restore(&mut self, area: &Area, x: u16, y: u16) {
        self.screen.restore(area, x, y);
    }

    fn release(&mut self, _area: Area) {}

    fn flush_pending_keys(&mut self) -> Result<()> {
        while event::poll(Duration::ZERO).context("poll terminal events")? {
            event::read().context("read terminal event")?;
        }
        Ok(())
    }

    fn read_key(&mut self) -> Result<Key> {
        self.present()?;
        loop {
            match event::read().context("read terminal event")? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(map_key(key));
                }
                Event::Resize(..) => {
                    // The shadow buffer keeps its size; repaint what we have.
                    queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
                    self.screen.invalidate();
                    self.present()?;
                }
                _ => {}
            }
        }
    }
}

fn map_key(key: KeyEvent) -> Key {
    match key.code {
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    }
}

fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Black => style::Color::Black,
        Color::Blue => style::Color::DarkBlue,
        Color::Green => style::Color::DarkGreen,
        Color::Cyan => style::Color::DarkCyan,
        Color::Red => style::Color::DarkRed,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Brown => style::Color::DarkYellow,
        Color::LightGray => style::Color::Grey,
        Color::DarkGray => style::Color::DarkGrey,
        Color::LightBlue => style::Color::Blue,
        Color::LightGreen => style::Color::Green,
        Color::LightCyan => style::Color::Cyan,
        Color::LightRed => style::Color::Red,
        Color::LightMagenta => style::Color::Magenta,
        Color::Yellow => style::Color::Yellow,
        Color::White => style::Color::White,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    #[test]
    fn key_events_map_to_menu_keys() {
        let ev = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(map_key(ev(KeyCode::Esc)), Key::Escape);
        assert_eq!(map_key(ev(KeyCode::Char(' '))), Key::Space);
        assert_eq!(map_key(ev(KeyCode::Char('8'))), Key::Char('8'));
        assert_eq!(map_key(ev(KeyCode::PageDown)), Key::Other);
    }
}
