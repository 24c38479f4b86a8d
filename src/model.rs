use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// A persisted page-view total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ViewCount(i64);

impl ViewCount {
    /// Reads a count out of a stored attribute. The writer stores numeric
    /// strings, but older records hold plain numbers; both are accepted.
    pub fn from_value(value: &Value) -> Option<ViewCount> {
        match value {
            Value::Number(number) => number.as_i64().map(ViewCount),
            Value::String(text) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::str::FromStr for ViewCount {
    type Err = std::num::ParseIntError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        input.trim().parse().map(ViewCount)
    }
}

impl std::fmt::Display for ViewCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for ViewCount {
    fn from(count: i64) -> Self {
        ViewCount(count)
    }
}

/// One record from the view-count table.
///
/// The count attribute has been renamed between deployments (`views` in older
/// tables, `count` in newer ones), so the record keeps every attribute as
/// stored and the reader picks one out by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ViewCountRecord {
    fields: BTreeMap<String, Value>,
}

impl ViewCountRecord {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
