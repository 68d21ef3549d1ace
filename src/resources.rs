use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for ResourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceValue::Int(v) => write!(f, "{v}"),
            ResourceValue::Str(s) => f.write_str(s),
        }
    }
}

/// Named settings the menu callbacks read and write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resources {
    values: BTreeMap<String, ResourceValue>,
}

/// Handle shared by every callback bound to the same store.
pub type SharedResources = Rc<RefCell<Resources>>;

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedResources {
        Rc::new(RefCell::new(self))
    }

    pub fn get(&self, name: &str) -> Option<&ResourceValue> {
        self.values.get(name)
    }

    /// Integer value; strings that parse as integers count too.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            ResourceValue::Int(v) => Some(*v),
            ResourceValue::Str(s) => s.trim().parse().ok(),
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            ResourceValue::Str(s) => Some(s),
            ResourceValue::Int(_) => None,
        }
    }

    pub fn set_int(&mut self, name: &str, value: i64) {
        self.values
            .insert(name.to_string(), ResourceValue::Int(value));
    }

    pub fn set_str(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .insert(name.to_string(), ResourceValue::Str(value.into()));
    }

    /// Flips an on/off resource (missing counts as off) and returns the new
    /// value.
    pub fn toggle(&mut self, name: &str) -> i64 {
        let next = i64::from(self.get_int(name).unwrap_or(0) == 0);
        self.set_int(name, next);
        next
    }

    /// Copies every value of `other` over this store.
    pub fn merge(&mut self, other: &Resources) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_creates() {
        let mut res = Resources::new();
        assert_eq!(res.toggle("Sound"), 1);
        assert_eq!(res.toggle("Sound"), 0);
        res.set_int("WarpMode", 5);
        assert_eq!(res.toggle("WarpMode"), 0);
    }

    #[test]
    fn json_round_trip_keeps_types() {
        let res: Resources =
            serde_json::from_str(r#"{"Drive8Type": 1541, "FSDevice8Dir": "/tmp", "Speed": "100"}"#)
                .unwrap();
        assert_eq!(res.get_int("Drive8Type"), Some(1541));
        assert_eq!(res.get_str("FSDevice8Dir"), Some("/tmp"));
        assert_eq!(res.get_int("Speed"), Some(100));
        assert_eq!(res.get_str("Drive8Type"), None);

        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["Drive8Type"], 1541);
        assert_eq!(json["FSDevice8Dir"], "/tmp");
    }

    #[test]
    fn merge_overrides() {
        let mut base = Resources::new();
        base.set_int("Sound", 1);
        base.set_int("SoundSampleRate", 22050);
        let mut over = Resources::new();
        over.set_int("SoundSampleRate", 44100);
        base.merge(&over);
        assert_eq!(base.get_int("Sound"), Some(1));
        assert_eq!(base.get_int("SoundSampleRate"), Some(44100));
        assert_eq!(base.len(), 2);
    }
}
