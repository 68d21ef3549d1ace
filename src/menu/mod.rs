//! Hierarchical text-mode menus.
//!
//! A [`Menu`] is a tree of commands, submenus and separators built with the
//! `add_*` methods or from a table of [`ItemDef`]s, then shown with
//! [`Engine::run`] on any [`Terminal`](crate::platform::Terminal).

pub mod builder;
pub mod callback;
pub mod engine;
pub mod label;
pub mod model;
pub mod render;
pub mod stock;
pub mod table;

pub use builder::{CommandDef, ItemDef};
pub use callback::{callback, Callback, Mode, Param, Reply};
pub use engine::{resolve, run, Engine, Outcome, Unwind};
pub use label::{parse_label, ParsedLabel, HOTKEY_MARKER};
pub use model::{Behavior, Entry, Menu, MenuItem};
pub use render::Palette;
pub use table::{EntryDef, MenuFile, OptionDef};
