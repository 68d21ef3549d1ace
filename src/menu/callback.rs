//! Contract between menu items and the code behind them.
//!
//! A callback is invoked in [`Mode::Poll`] to refresh the parameter string
//! an item shows on the right, and in [`Mode::Activate`] when the user
//! triggers the item. It has no error channel: failures are reported by the
//! callback itself through whatever dialog or status mechanism it owns.

use std::fmt;
use std::rc::Rc;

use super::model::Behavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Poll,
    Activate,
}

/// Typed context handed to a callback alongside the mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Param {
    #[default]
    None,
    Int(i64),
    /// Name of a resource in the settings store.
    Resource(String),
    /// One option of a mutually exclusive group sharing `resource`.
    Choice { resource: String, value: i64 },
    Text(String),
}

impl Param {
    pub fn resource(&self) -> Option<&str> {
        match self {
            Param::Resource(name) | Param::Choice { resource: name, .. } => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// New parameter string; `None` clears it.
    pub display: Option<String>,
    /// This item reflects the stored value among its siblings.
    pub become_default: bool,
    /// Overrides the item's static behavior for this activation.
    pub behavior: Option<Behavior>,
}

impl Reply {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn text(display: impl Into<String>) -> Self {
        Self {
            display: Some(display.into()),
            ..Default::default()
        }
    }

    pub fn default_choice(mut self, is_default: bool) -> Self {
        self.become_default = is_default;
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = Some(behavior);
        self
    }
}

/// Shared so one callback can back several items (radio groups).
pub type Callback = Rc<dyn Fn(Mode, &Param) -> Reply>;

pub fn callback(f: impl Fn(Mode, &Param) -> Reply + 'static) -> Callback {
    Rc::new(f)
}

/// Debug-friendly wrapper for an optional callback.
pub(crate) struct CallbackSlot<'a>(pub &'a Option<Callback>);

impl fmt::Debug for CallbackSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Some(<callback>)"),
            None => f.write_str("None"),
        }
    }
}
