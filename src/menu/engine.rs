//! Interactive navigation over a [`Menu`] tree.
//!
//! Each call to [`Engine::run`] owns one window. Submenus are plain
//! recursive calls, and the [`Unwind`] value each call returns tells its
//! caller whether to keep going, close, or collapse the whole stack.

use anyhow::Result;
use tracing::debug;

use crate::platform::{Area, Key, Terminal};

use super::callback::Mode;
use super::model::{Behavior, Menu, MenuItem};
use super::render::{draw_entry, draw_status, Geometry, Palette};

/// Signal a menu level hands back to whoever opened it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Unwind {
    /// This level is done; the caller decides for itself.
    CloseLevel = 0,
    /// Every level up to the top-level caller closes.
    ResumeAll = 1,
}

impl Unwind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Result of activating an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Stay,
    Return(Unwind),
}

/// Combines a nested level's signal with the activated item's effective
/// behavior.
pub fn resolve(child: Unwind, behavior: Behavior) -> Outcome {
    if child == Unwind::ResumeAll {
        return Outcome::Return(Unwind::ResumeAll);
    }
    match behavior {
        Behavior::Continue => Outcome::Stay,
        Behavior::Close => Outcome::Return(Unwind::CloseLevel),
        Behavior::Resume => Outcome::Return(Unwind::ResumeAll),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Moves the selection to the nearest selectable item, wrapping around.
///
/// From no selection, `Up` lands on the last selectable item and `Down` on
/// the first. With nothing else selectable the selection stays put.
pub fn step(items: &[MenuItem], from: Option<usize>, direction: Direction) -> Option<usize> {
    let len = items.len();
    let reachable = |i: &usize| !items[*i].is_separator();

    let Some(current) = from.filter(|&i| i < len) else {
        return match direction {
            Direction::Up => (0..len).rev().find(reachable),
            Direction::Down => (0..len).find(reachable),
        };
    };

    let found = (1..len)
        .map(|offset| match direction {
            Direction::Up => (current + len - offset) % len,
            Direction::Down => (current + offset) % len,
        })
        .find(reachable);
    Some(found.unwrap_or(current))
}

/// First selectable item whose hotkey matches the typed character.
pub fn find_hotkey(items: &[MenuItem], key: char) -> Option<usize> {
    if !key.is_ascii_alphanumeric() {
        return None;
    }
    let key = key.to_ascii_uppercase();
    items.iter().position(|item| item.hotkey() == Some(key))
}

/// A drawn menu frame plus the screen area it covers. The area goes back on
/// screen and is released exactly once, when the window closes or is
/// dropped on an early return.
struct Window<'t, T: Terminal + ?Sized> {
    term: &'t mut T,
    saved: Option<Area>,
    x: u16,
    y: u16,
}

impl<'t, T: Terminal + ?Sized> Window<'t, T> {
    fn open(term: &'t mut T, geometry: &Geometry, palette: &Palette, title: Option<&str>) -> Self {
        let saved = term.draw_window(
            geometry.x,
            geometry.y,
            geometry.width,
            geometry.height,
            palette.border,
            palette.back,
            title,
        );
        Self {
            term,
            saved: Some(saved),
            x: geometry.x,
            y: geometry.y,
        }
    }

    fn term(&mut self) -> &mut T {
        &mut *self.term
    }

    fn close(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.term.restore(&saved, self.x, self.y);
            self.term.release(saved);
        }
    }
}

impl<T: Terminal + ?Sized> Drop for Window<'_, T> {
    fn drop(&mut self) {
        self.restore();
    }
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    palette: Palette,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_palette(palette: Palette) -> Self {
        Self { palette }
    }

    /// Shows `menu` and handles keys until this level closes.
    pub fn run<T: Terminal + ?Sized>(&self, menu: &mut Menu, term: &mut T) -> Result<Unwind> {
        term.flush_pending_keys()?;

        let geometry = Geometry::new(menu, term.num_cols(), term.num_rows());
        let mut window = Window::open(term, &geometry, &self.palette, menu.title());
        debug!(title = ?menu.title(), items = menu.len(), "menu opened");

        let mut selected = if menu.is_empty() { None } else { Some(0) };

        loop {
            self.redraw(menu, &geometry, window.term());
            self.highlight(menu, &geometry, selected, window.term());

            let key = window.term().read_key()?;
            debug!(?key, ?selected, "key");

            let target = match key {
                Key::Escape => {
                    window.close();
                    debug!(title = ?menu.title(), "menu escaped");
                    return Ok(Unwind::CloseLevel);
                }
                Key::Up => {
                    selected = step(menu.items(), selected, Direction::Up);
                    None
                }
                Key::Down => {
                    selected = step(menu.items(), selected, Direction::Down);
                    None
                }
                Key::Space | Key::Enter => selected,
                Key::Char(c) => find_hotkey(menu.items(), c).inspect(|&index| {
                    selected = Some(index);
                }),
                Key::Other => None,
            };

            let Some(index) = target else {
                continue;
            };
            self.highlight(menu, &geometry, selected, window.term());

            if let Outcome::Return(unwind) = self.activate(menu, index, window.term())? {
                window.close();
                debug!(title = ?menu.title(), code = unwind.code(), "menu closed");
                return Ok(unwind);
            }
        }
    }

    /// Runs the item's submenu (if any), then its callback, and resolves
    /// what this level does next.
    fn activate<T: Terminal + ?Sized>(
        &self,
        menu: &mut Menu,
        index: usize,
        term: &mut T,
    ) -> Result<Outcome> {
        let Some(item) = menu.items.get_mut(index) else {
            return Ok(Outcome::Stay);
        };

        let child = match item {
            MenuItem::Separator => return Ok(Outcome::Stay),
            MenuItem::Command(_) => Unwind::CloseLevel,
            MenuItem::Submenu { child, .. } => self.run(child, term)?,
        };

        let Some(entry) = item.entry_mut() else {
            return Ok(Outcome::Stay);
        };
        let reply = entry.invoke(Mode::Activate);
        let behavior = reply.behavior.unwrap_or(entry.behavior);
        let outcome = resolve(child, behavior);
        debug!(label = %entry.label, ?child, ?behavior, ?outcome, "activated");
        Ok(outcome)
    }

    /// Polls and paints every item unhighlighted.
    fn redraw<T: Terminal + ?Sized>(&self, menu: &mut Menu, geometry: &Geometry, term: &mut T) {
        for (i, item) in menu.items.iter_mut().enumerate() {
            let Some(entry) = item.entry_mut() else {
                continue;
            };
            entry.invoke(Mode::Poll);
            draw_entry(term, entry, geometry, geometry.row(i), false, &self.palette);
        }
    }

    fn highlight<T: Terminal + ?Sized>(
        &self,
        menu: &Menu,
        geometry: &Geometry,
        selected: Option<usize>,
        term: &mut T,
    ) {
        match selected.and_then(|i| Some((i, menu.items().get(i)?.entry()?))) {
            Some((i, entry)) => {
                draw_entry(term, entry, geometry, geometry.row(i), true, &self.palette);
                draw_status(term, entry.help(), &self.palette);
            }
            None => draw_status(term, None, &self.palette),
        }
    }
}

/// Runs `menu` with the default palette.
pub fn run<T: Terminal + ?Sized>(menu: &mut Menu, term: &mut T) -> Result<Unwind> {
    Engine::new().run(menu, term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::callback::Param;

    fn items(layout: &str) -> Menu {
        let mut menu = Menu::new(None, 1);
        for (i, c) in layout.chars().enumerate() {
            if c == '-' {
                menu.add_separator();
            } else {
                let label = format!("Item {i}");
                menu.add_item(&label, None, None, Param::None, 0, Behavior::Continue);
            }
        }
        menu
    }

    #[test]
    fn resolve_table() {
        use Behavior::*;
        use Unwind::*;
        assert_eq!(resolve(CloseLevel, Continue), Outcome::Stay);
        assert_eq!(resolve(CloseLevel, Close), Outcome::Return(CloseLevel));
        assert_eq!(resolve(CloseLevel, Resume), Outcome::Return(ResumeAll));
        for behavior in [Continue, Close, Resume] {
            assert_eq!(resolve(ResumeAll, behavior), Outcome::Return(ResumeAll));
        }
        assert_eq!((CloseLevel.code(), ResumeAll.code()), (0, 1));
    }

    #[test]
    fn down_skips_separators_and_wraps() {
        let menu = items("x-x--x-");
        let mut at = Some(0);
        let mut visited = Vec::new();
        for _ in 0..6 {
            at = step(menu.items(), at, Direction::Down);
            visited.push(at.unwrap());
        }
        assert_eq!(visited, vec![2, 5, 0, 2, 5, 0]);
    }

    #[test]
    fn up_skips_separators_and_wraps() {
        let menu = items("-x-xx-");
        let mut at = Some(1);
        let mut visited = Vec::new();
        for _ in 0..4 {
            at = step(menu.items(), at, Direction::Up);
            visited.push(at.unwrap());
        }
        assert_eq!(visited, vec![4, 3, 1, 4]);
    }

    #[test]
    fn lone_item_stays_selected() {
        let menu = items("-x-");
        assert_eq!(step(menu.items(), Some(1), Direction::Down), Some(1));
        assert_eq!(step(menu.items(), Some(1), Direction::Up), Some(1));
    }

    #[test]
    fn starting_on_a_separator_moves_to_neighbours() {
        let menu = items("-xx");
        assert_eq!(step(menu.items(), Some(0), Direction::Down), Some(1));
        assert_eq!(step(menu.items(), Some(0), Direction::Up), Some(2));
    }

    #[test]
    fn unselected_jumps_to_ends() {
        let menu = items("x-x-");
        assert_eq!(step(menu.items(), None, Direction::Up), Some(2));
        assert_eq!(step(menu.items(), None, Direction::Down), Some(0));

        let only_separators = items("--");
        assert_eq!(step(only_separators.items(), None, Direction::Down), None);
        assert_eq!(step(only_separators.items(), Some(0), Direction::Down), Some(0));
        assert_eq!(step(&[], None, Direction::Up), None);
    }

    #[test]
    fn hotkeys_match_case_insensitively_first_wins() {
        let mut menu = Menu::new(None, 1);
        menu.add_item("_Sound", None, None, Param::None, 0, Behavior::Continue);
        menu.add_separator();
        menu.add_item("_Speed", None, None, Param::None, 0, Behavior::Continue);
        menu.add_item("_8 drive", None, None, Param::None, 0, Behavior::Continue);

        assert_eq!(find_hotkey(menu.items(), 's'), Some(0));
        assert_eq!(find_hotkey(menu.items(), 'S'), Some(0));
        assert_eq!(find_hotkey(menu.items(), '8'), Some(3));
        assert_eq!(find_hotkey(menu.items(), 'q'), None);
        assert_eq!(find_hotkey(menu.items(), '#'), None);
    }
}
