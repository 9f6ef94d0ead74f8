//! Field access on opaque row records.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use serde_json::{Map, Value};

/// A row the table can display.
///
/// Rows are opaque to the table except for named field lookups, which back
/// both `data_index` cells and the configured row key. A missing field is
/// `None` and renders as an empty string.
pub trait Record {
    /// Display value of the named field.
    fn field(&self, name: &str) -> Option<String>;
}

fn json_display(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).and_then(json_display)
    }
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<String> {
        self.as_object().and_then(|obj| obj.field(name))
    }
}

impl<V: Display> Record for HashMap<String, V> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).map(ToString::to_string)
    }
}

impl<V: Display> Record for BTreeMap<String, V> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).map(ToString::to_string)
    }
}
