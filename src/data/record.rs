use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::data::datavalue::DataValue;

/// Stable identifier of a record within a collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// A column-addressable entity the table view can display.
///
/// The engine only ever reads through this trait; records are never mutated.
pub trait Record {
    fn id(&self) -> RecordId;

    /// Value stored under `key`. Unknown keys yield `DataValue::Null`.
    fn value(&self, key: &str) -> DataValue;
}

impl Record for JsonValue {
    fn id(&self) -> RecordId {
        match self.get("id") {
            Some(JsonValue::Number(n)) => n
                .as_i64()
                .map(RecordId::Number)
                .unwrap_or_else(|| RecordId::Text(n.to_string())),
            Some(JsonValue::String(s)) => RecordId::Text(s.clone()),
            _ => RecordId::Text(String::new()),
        }
    }

    fn value(&self, key: &str) -> DataValue {
        if let Some(direct) = self.get(key) {
            return DataValue::from_json(direct);
        }
        match key.split_once('.') {
            Some((head, rest)) => self
                .get(head)
                .map(|nested| DataValue::from_json(nested).member(rest))
                .unwrap_or(DataValue::Null),
            None => DataValue::Null,
        }
    }
}
