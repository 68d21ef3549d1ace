//! Settings screens declared as JSON and bound to a resource store.
//!
//! ```json
//! { "title": "Audio Settings",
//!   "items": [
//!     { "type": "toggle", "label": "_Sound:", "resource": "Sound" },
//!     { "type": "separator" },
//!     { "type": "choice", "label": "Sample _rate:", "resource": "SoundSampleRate",
//!       "options": [ { "label": "_0: 8000 Hz", "value": 8000 },
//!                    { "label": "_1: 44100 Hz", "value": 44100 } ] } ] }
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::resources::SharedResources;

use super::builder::{CommandDef, ItemDef};
use super::callback::Param;
use super::label::parse_label;
use super::model::{Behavior, Menu};
use super::stock;

const BUNDLED: &str = include_str!("../../demos/settings.json");

const TOGGLE_WIDTH: usize = 3;
const VALUE_WIDTH: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuFile {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default = "default_spacing")]
    pub spacing: u16,

    #[serde(default)]
    pub items: Vec<EntryDef>,
}

fn default_spacing() -> u16 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryDef {
    /// On/off integer resource.
    Toggle {
        label: String,
        #[serde(default)]
        help: Option<String>,
        resource: String,
    },
    /// Shows a resource's current value.
    Value {
        label: String,
        #[serde(default)]
        help: Option<String>,
        resource: String,
        #[serde(default)]
        width: Option<usize>,
        #[serde(default)]
        behavior: Behavior,
    },
    /// Submenu of mutually exclusive options for one resource.
    Choice {
        label: String,
        #[serde(default)]
        help: Option<String>,
        #[serde(default)]
        title: Option<String>,
        resource: String,
        options: Vec<OptionDef>,
        #[serde(default)]
        width: Option<usize>,
    },
    Submenu {
        label: String,
        #[serde(default)]
        help: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        items: Vec<EntryDef>,
    },
    /// Plain command that only applies its behavior.
    Action {
        label: String,
        #[serde(default)]
        help: Option<String>,
        #[serde(default)]
        behavior: Behavior,
    },
    Separator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDef {
    pub label: String,
    #[serde(default)]
    pub help: Option<String>,
    pub value: i64,
}

impl MenuFile {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading menu {}", path.display()))?;
        let file: MenuFile =
            serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
        Ok(file)
    }

    /// Settings menu shipped with the crate.
    pub fn bundled() -> Result<Self> {
        serde_json::from_str(BUNDLED).context("parsing bundled settings menu")
    }

    pub fn to_item_defs(&self, resources: &SharedResources) -> Vec<ItemDef> {
        to_item_defs(&self.items, resources)
    }

    pub fn build(&self, resources: &SharedResources) -> Menu {
        let mut menu = Menu::new(self.title.as_deref(), self.spacing);
        menu.add_bulk(&self.to_item_defs(resources));
        menu
    }
}

fn to_item_defs(entries: &[EntryDef], resources: &SharedResources) -> Vec<ItemDef> {
    entries
        .iter()
        .map(|entry| to_item_def(entry, resources))
        .collect()
}

fn to_item_def(entry: &EntryDef, resources: &SharedResources) -> ItemDef {
    match entry {
        EntryDef::Toggle {
            label,
            help,
            resource,
        } => with_help(CommandDef::new(label), help)
            .callback(stock::toggle(resources.clone()))
            .param(Param::Resource(resource.clone()))
            .width(TOGGLE_WIDTH)
            .into(),
        EntryDef::Value {
            label,
            help,
            resource,
            width,
            behavior,
        } => with_help(CommandDef::new(label), help)
            .callback(stock::show_value(resources.clone()))
            .param(Param::Resource(resource.clone()))
            .width(width.unwrap_or(VALUE_WIDTH))
            .behavior(*behavior)
            .into(),
        EntryDef::Choice {
            label,
            help,
            title,
            resource,
            options,
            width,
        } => choice(label, help, title, resource, options, *width, resources),
        EntryDef::Submenu {
            label,
            help,
            title,
            items,
        } => ItemDef::submenu(
            with_help(CommandDef::new(label), help),
            title.as_deref(),
            to_item_defs(items, resources),
        ),
        EntryDef::Action {
            label,
            help,
            behavior,
        } => with_help(CommandDef::new(label), help)
            .behavior(*behavior)
            .into(),
        EntryDef::Separator => ItemDef::Separator,
    }
}

fn choice(
    label: &str,
    help: &Option<String>,
    title: &Option<String>,
    resource: &str,
    options: &[OptionDef],
    width: Option<usize>,
    resources: &SharedResources,
) -> ItemDef {
    let names: Vec<(i64, String)> = options
        .iter()
        .map(|o| (o.value, parse_label(&o.label).text))
        .collect();
    let width = width.unwrap_or_else(|| names.iter().map(|(_, n)| n.width()).max().unwrap_or(0));

    let radio = stock::radio(resources.clone());
    let items = options
        .iter()
        .map(|o| {
            ItemDef::from(
                with_help(CommandDef::new(&o.label), &o.help)
                    .callback(radio.clone())
                    .param(Param::Choice {
                        resource: resource.to_string(),
                        value: o.value,
                    })
                    .behavior(Behavior::Close),
            )
        })
        .collect();

    let title = title
        .clone()
        .unwrap_or_else(|| parse_label(label).text.trim_end_matches(':').to_string());

    ItemDef::submenu(
        with_help(CommandDef::new(label), help)
            .callback(stock::choice_label(resources.clone(), names))
            .param(Param::Resource(resource.to_string()))
            .width(width),
        Some(title.as_str()),
        items,
    )
}

fn with_help(def: CommandDef, help: &Option<String>) -> CommandDef {
    match help {
        Some(help) => def.help(help.clone()),
        None => def,
    }
}
