use tracing::warn;

use super::callback::{Callback, Mode, Param};
use super::label::parse_label;
use super::model::{title_width, Behavior, Entry, Menu, MenuItem};

/// Declarative description of a command (or of a submenu's own entry).
#[derive(Clone, Default)]
pub struct CommandDef {
    pub label: String,
    pub help: Option<String>,
    pub callback: Option<Callback>,
    pub param: Param,
    pub max_param_width: usize,
    pub behavior: Behavior,
}

impl CommandDef {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn callback(mut self, callback: Callback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.param = param;
        self
    }

    pub fn width(mut self, max_param_width: usize) -> Self {
        self.max_param_width = max_param_width;
        self
    }

    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }
}

/// One record of a declarative item table. The end of the slice ends the
/// table.
#[derive(Clone)]
pub enum ItemDef {
    Command(CommandDef),
    /// The nested table is loaded into a fresh child menu titled `title`.
    Submenu {
        def: CommandDef,
        title: Option<String>,
        items: Vec<ItemDef>,
    },
    Separator,
}

impl ItemDef {
    pub fn submenu(def: CommandDef, title: Option<&str>, items: Vec<ItemDef>) -> Self {
        ItemDef::Submenu {
            def,
            title: title.map(str::to_string),
            items,
        }
    }
}

impl From<CommandDef> for ItemDef {
    fn from(def: CommandDef) -> Self {
        ItemDef::Command(def)
    }
}

impl Menu {
    pub fn new(title: Option<&str>, spacing: u16) -> Self {
        Self {
            title: title.map(str::to_string),
            spacing: spacing.max(1),
            width: title_width(title),
            items: Vec::new(),
        }
    }

    /// Appends a command and polls its callback once so the parameter string
    /// is ready before the menu is first shown. Returns the columns the item
    /// needs.
    pub fn add_item(
        &mut self,
        label: &str,
        help: Option<&str>,
        callback: Option<Callback>,
        param: Param,
        max_param_width: usize,
        behavior: Behavior,
    ) -> usize {
        let mut entry = self.new_entry(label, help, callback, param, max_param_width, behavior);
        entry.invoke(Mode::Poll);
        let width = self.account(&entry);
        self.items.push(MenuItem::Command(entry));
        width
    }

    /// Appends an entry that opens `child`. Submenu entries always continue;
    /// only the child's outcome or the callback's override can close this
    /// level.
    pub fn add_submenu(
        &mut self,
        label: &str,
        help: Option<&str>,
        child: Menu,
        callback: Option<Callback>,
        param: Param,
        max_param_width: usize,
    ) -> usize {
        let entry = self.new_entry(
            label,
            help,
            callback,
            param,
            max_param_width,
            Behavior::Continue,
        );
        let width = self.account(&entry);
        self.items.push(MenuItem::Submenu {
            entry,
            child: Box::new(child),
        });
        width
    }

    pub fn add_separator(&mut self) {
        self.items.push(MenuItem::Separator);
    }

    /// Loads a whole table in order, recursing into submenu records.
    pub fn add_bulk(&mut self, defs: &[ItemDef]) {
        for def in defs {
            match def {
                ItemDef::Command(cmd) => {
                    self.add_item(
                        &cmd.label,
                        cmd.help.as_deref(),
                        cmd.callback.clone(),
                        cmd.param.clone(),
                        cmd.max_param_width,
                        cmd.behavior,
                    );
                }
                ItemDef::Submenu { def, title, items } => {
                    let mut child = Menu::new(title.as_deref(), 1);
                    child.add_bulk(items);
                    self.add_submenu(
                        &def.label,
                        def.help.as_deref(),
                        child,
                        def.callback.clone(),
                        def.param.clone(),
                        def.max_param_width,
                    );
                }
                ItemDef::Separator => self.add_separator(),
            }
        }
    }

    fn new_entry(
        &self,
        label: &str,
        help: Option<&str>,
        callback: Option<Callback>,
        param: Param,
        max_param_width: usize,
        behavior: Behavior,
    ) -> Entry {
        let parsed = parse_label(label);
        if let Some(key) = parsed.hotkey {
            if self.items.iter().any(|item| item.hotkey() == Some(key)) {
                warn!(label, hotkey = %key, "hotkey already used in this menu; first item wins");
            }
        }
        Entry {
            label: parsed.text,
            help: help.map(str::to_string),
            hotkey: parsed.hotkey,
            hotkey_offset: parsed.hotkey_offset,
            callback,
            param,
            display: None,
            max_param_width,
            behavior,
            is_default: false,
        }
    }

    fn account(&mut self, entry: &Entry) -> usize {
        let width = entry.width();
        self.width = self.width.max(width);
        width
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::menu::callback::{callback, Reply};

    #[test]
    fn width_tracks_widest_item() {
        let mut menu = Menu::new(Some("Attach Images"), 1);
        assert_eq!(menu.width(), 18);

        assert_eq!(menu.add_item("Drive #_8:", None, None, Param::None, 30, Behavior::Continue), 40);
        assert_eq!(menu.width(), 40);

        assert_eq!(menu.add_item("_Tape", None, None, Param::None, 0, Behavior::Continue), 4);
        assert_eq!(menu.width(), 40);

        menu.add_separator();
        assert_eq!(menu.width(), 40);
        assert_eq!(menu.len(), 3);
    }

    #[test]
    fn add_item_polls_once() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let cb = callback(move |mode, _| {
            assert_eq!(mode, Mode::Poll);
            seen.set(seen.get() + 1);
            Reply::text("(none)")
        });

        let mut menu = Menu::new(None, 1);
        menu.add_item("Drive #_9:", None, Some(cb), Param::Int(9), 30, Behavior::Continue);

        assert_eq!(calls.get(), 1);
        let entry = menu.items()[0].entry().unwrap();
        assert_eq!(entry.display(), Some("(none)"));
        assert_eq!(entry.label(), "Drive #9:");
        assert_eq!(entry.hotkey(), Some('9'));
        assert_eq!(entry.param(), &Param::Int(9));
    }

    #[test]
    fn submenu_is_not_polled_and_continues() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let cb = callback(move |_, _| {
            seen.set(seen.get() + 1);
            Reply::text("1541")
        });

        let mut menu = Menu::new(None, 1);
        let child = Menu::new(Some("Drive 8 model"), 1);
        let width = menu.add_submenu("Drive #_8 model:", None, child, Some(cb), Param::Int(8), 26);

        assert_eq!(width, 15 + 27);
        assert_eq!(calls.get(), 0);
        let item = &menu.items()[0];
        assert_eq!(item.entry().unwrap().behavior(), Behavior::Continue);
        assert_eq!(item.child().unwrap().title(), Some("Drive 8 model"));
    }

    #[test]
    fn bulk_table_keeps_order_and_separators() {
        let table = vec![
            CommandDef::new("_Normal").behavior(Behavior::Close).into(),
            ItemDef::Separator,
            ItemDef::submenu(
                CommandDef::new("_More..."),
                Some("More"),
                vec![CommandDef::new("_Inner").into(), ItemDef::Separator],
            ),
            CommandDef::new("_Full").width(7).into(),
        ];

        let mut menu = Menu::new(None, 1);
        menu.add_bulk(&table);

        let labels: Vec<Option<&str>> = menu
            .items()
            .iter()
            .map(|item| item.entry().map(Entry::label))
            .collect();
        assert_eq!(labels, vec![Some("Normal"), None, Some("More..."), Some("Full")]);
        assert_eq!(menu.reachable(), vec![0, 2, 3]);
        assert_eq!(menu.items()[0].entry().unwrap().behavior(), Behavior::Close);

        let child = menu.items()[2].child().unwrap();
        assert_eq!(child.title(), Some("More"));
        assert_eq!(child.len(), 2);
        assert!(child.items()[1].is_separator());
    }

    #[test]
    fn clear_resets_to_title_width() {
        let mut menu = Menu::new(Some("Quit"), 2);
        menu.add_item("_Yes, quit the emulator", None, None, Param::None, 0, Behavior::Resume);
        assert!(menu.width() > 8);
        menu.clear();
        assert!(menu.is_empty());
        assert_eq!(menu.width(), 8);
        assert_eq!(menu.spacing(), 2);
    }
}
