use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;
use unicode_width::UnicodeWidthStr;

use super::callback::{Callback, CallbackSlot, Mode, Param, Reply};

/// What happens to the containing menu after an item is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    /// Stay in this menu.
    #[default]
    Continue,
    /// Close this menu only.
    Close,
    /// Close every menu up to the top-level caller.
    Resume,
}

/// Fields shared by commands and submenu entries.
pub struct Entry {
    pub(crate) label: String,
    pub(crate) help: Option<String>,
    pub(crate) hotkey: Option<char>,
    pub(crate) hotkey_offset: Option<usize>,
    pub(crate) callback: Option<Callback>,
    pub(crate) param: Param,
    pub(crate) display: Option<String>,
    pub(crate) max_param_width: usize,
    pub(crate) behavior: Behavior,
    pub(crate) is_default: bool,
}

impl Entry {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn hotkey(&self) -> Option<char> {
        self.hotkey
    }

    pub fn hotkey_offset(&self) -> Option<usize> {
        self.hotkey_offset
    }

    pub fn param(&self) -> &Param {
        &self.param
    }

    /// Parameter string from the last callback invocation.
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn max_param_width(&self) -> usize {
        self.max_param_width
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// Whether the last reply flagged this item as the current choice.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Columns this entry needs: label plus a gap and the parameter field.
    pub fn width(&self) -> usize {
        let label = self.label.width();
        if self.max_param_width > 0 {
            label + self.max_param_width + 1
        } else {
            label
        }
    }

    /// Runs the callback and caches what it returned. Without a callback the
    /// cached string is cleared.
    pub(crate) fn invoke(&mut self, mode: Mode) -> Reply {
        let Some(callback) = &self.callback else {
            self.display = None;
            self.is_default = false;
            return Reply::none();
        };
        let reply = callback(mode, &self.param);
        trace!(label = %self.label, ?mode, display = ?reply.display, "callback");
        self.display = reply.display.clone();
        self.is_default = reply.become_default;
        reply
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("label", &self.label)
            .field("help", &self.help)
            .field("hotkey", &self.hotkey)
            .field("hotkey_offset", &self.hotkey_offset)
            .field("callback", &CallbackSlot(&self.callback))
            .field("param", &self.param)
            .field("display", &self.display)
            .field("max_param_width", &self.max_param_width)
            .field("behavior", &self.behavior)
            .finish()
    }
}

#[derive(Debug)]
pub enum MenuItem {
    Command(Entry),
    /// Activation runs the child menu first, then this entry's callback.
    Submenu { entry: Entry, child: Box<Menu> },
    /// Occupies a row; never selectable.
    Separator,
}

impl MenuItem {
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            MenuItem::Command(entry) | MenuItem::Submenu { entry, .. } => Some(entry),
            MenuItem::Separator => None,
        }
    }

    pub(crate) fn entry_mut(&mut self) -> Option<&mut Entry> {
        match self {
            MenuItem::Command(entry) | MenuItem::Submenu { entry, .. } => Some(entry),
            MenuItem::Separator => None,
        }
    }

    pub fn child(&self) -> Option<&Menu> {
        match self {
            MenuItem::Submenu { child, .. } => Some(child),
            _ => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, MenuItem::Separator)
    }

    pub fn hotkey(&self) -> Option<char> {
        self.entry().and_then(Entry::hotkey)
    }
}

#[derive(Debug)]
pub struct Menu {
    pub(crate) title: Option<String>,
    pub(crate) spacing: u16,
    pub(crate) width: usize,
    pub(crate) items: Vec<MenuItem>,
}

/// Width a title reserves: its length plus a margin, rounded up to even.
pub(crate) fn title_width(title: Option<&str>) -> usize {
    let Some(title) = title else {
        return 0;
    };
    let width = title.width() + 4;
    width + width % 2
}

impl Menu {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Rows per item.
    pub fn spacing(&self) -> u16 {
        self.spacing
    }

    /// Columns needed by the widest item (or the title).
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Indices of the items navigation can land on.
    pub fn reachable(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_separator())
            .map(|(i, _)| i)
            .collect()
    }

    /// First item whose callback last reported it as the current choice.
    pub fn default_index(&self) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.entry().is_some_and(Entry::is_default))
    }

    /// Polls every callback in this menu and all submenus below it.
    pub fn refresh(&mut self) {
        for item in &mut self.items {
            match item {
                MenuItem::Command(entry) => {
                    entry.invoke(Mode::Poll);
                }
                MenuItem::Submenu { entry, child } => {
                    entry.invoke(Mode::Poll);
                    child.refresh();
                }
                MenuItem::Separator => {}
            }
        }
    }

    /// Indented listing of this menu and every submenu below it, one item
    /// per line with its cached parameter string.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        for item in &self.items {
            let Some(entry) = item.entry() else {
                out.push_str(&format!("{indent}--\n"));
                continue;
            };
            out.push_str(&indent);
            out.push_str(entry.label());
            if let Some(key) = entry.hotkey() {
                out.push_str(&format!(" [{key}]"));
            }
            if let Some(display) = entry.display() {
                out.push_str(&format!(" = {display}"));
            }
            out.push('\n');
            if let Some(child) = item.child() {
                child.write_outline(out, depth + 1);
            }
        }
    }

    /// Drops every item, leaving an empty menu with the same title.
    pub fn clear(&mut self) {
        self.items.clear();
        self.width = title_width(self.title.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_width_is_padded_and_even() {
        assert_eq!(title_width(None), 0);
        assert_eq!(title_width(Some("Reset?")), 10);
        assert_eq!(title_width(Some("Quit")), 8);
        assert_eq!(title_width(Some("Info!")), 10);
    }

    #[test]
    fn outline_nests_submenus() {
        let mut child = Menu::new(Some("Model"), 1);
        child.add_item("_1541", None, None, Param::None, 0, Behavior::Close);
        let mut menu = Menu::new(None, 1);
        menu.add_submenu("Drive _model...", None, child, None, Param::None, 0);
        menu.add_separator();
        menu.add_item("_Quit", None, None, Param::None, 0, Behavior::Resume);

        assert_eq!(menu.outline(), "Drive model... [M]\n  1541 [1]\n--\nQuit [Q]\n");
    }

    #[test]
    fn behavior_names_in_json() {
        let b: Behavior = serde_json::from_str("\"resume\"").unwrap();
        assert_eq!(b, Behavior::Resume);
        assert_eq!(serde_json::to_string(&Behavior::Close).unwrap(), "\"close\"");
    }
}
