//! Ready-made callbacks over a [`SharedResources`] store.

use crate::resources::{ResourceValue, SharedResources};

use super::callback::{callback, Callback, Mode, Param, Reply};
use super::model::Behavior;

/// On/off switch for `Param::Resource`. Shows `On` or `Off`.
pub fn toggle(resources: SharedResources) -> Callback {
    callback(move |mode, param| {
        let Param::Resource(name) = param else {
            return Reply::none();
        };
        if mode == Mode::Activate {
            resources.borrow_mut().toggle(name);
        }
        let on = resources.borrow().get_int(name).unwrap_or(0) != 0;
        Reply::text(if on { "On" } else { "Off" })
    })
}

/// One option of a radio group (`Param::Choice`). Activation stores the
/// option's value; every reply reports whether it is the stored one.
pub fn radio(resources: SharedResources) -> Callback {
    callback(move |mode, param| {
        let Param::Choice { resource, value } = param else {
            return Reply::none();
        };
        if mode == Mode::Activate {
            resources.borrow_mut().set_int(resource, *value);
        }
        let current = resources.borrow().get_int(resource);
        Reply::none().default_choice(current == Some(*value))
    })
}

/// Shows the value of `Param::Resource`, or `(none)` when unset or empty.
pub fn show_value(resources: SharedResources) -> Callback {
    callback(move |_, param| {
        let Param::Resource(name) = param else {
            return Reply::none();
        };
        match resources.borrow().get(name) {
            Some(ResourceValue::Str(s)) if s.is_empty() => Reply::text("(none)"),
            Some(value) => Reply::text(value.to_string()),
            None => Reply::text("(none)"),
        }
    })
}

/// Shows the label of the option matching `Param::Resource`'s value.
pub fn choice_label(resources: SharedResources, options: Vec<(i64, String)>) -> Callback {
    callback(move |_, param| {
        let Param::Resource(name) = param else {
            return Reply::none();
        };
        let current = resources.borrow().get_int(name);
        let label = options
            .iter()
            .find(|(value, _)| Some(*value) == current)
            .map(|(_, label)| label.as_str())
            .unwrap_or("Unknown");
        Reply::text(label)
    })
}

/// Asks for every menu level to close once activated.
pub fn resume() -> Callback {
    callback(|mode, _| match mode {
        Mode::Activate => Reply::none().with_behavior(Behavior::Resume),
        Mode::Poll => Reply::none(),
    })
}
