use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::fmt;

/// A single cell value read from a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Json(JsonValue), // Nested objects and arrays, kept as-is
    Null,
}

impl DataValue {
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => DataValue::Null,
            JsonValue::Bool(b) => DataValue::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DataValue::Integer(i)
                } else {
                    n.as_f64().map(DataValue::Float).unwrap_or(DataValue::Null)
                }
            }
            JsonValue::String(s) => DataValue::Text(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => DataValue::Json(value.clone()),
        }
    }

    /// Resolve a dot separated path inside a nested JSON value.
    ///
    /// Scalars have no members, so any path on them resolves to `Null`.
    pub fn member(&self, path: &str) -> DataValue {
        let DataValue::Json(root) = self else {
            return DataValue::Null;
        };

        let mut current = root;
        for segment in path.split('.') {
            match current.get(segment) {
                Some(next) => current = next,
                None => return DataValue::Null,
            }
        }
        DataValue::from_json(current)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Integer or float view of the value. Text is parsed as an integer
    /// before falling back to a float.
    fn as_number(&self) -> Option<DataValue> {
        match self {
            DataValue::Integer(_) | DataValue::Float(_) => Some(self.clone()),
            DataValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .map(DataValue::Integer)
                    .or_else(|_| s.parse::<f64>().map(DataValue::Float))
                    .ok()
            }
            _ => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            DataValue::Null => 0,
            DataValue::Boolean(_) => 1,
            DataValue::Integer(_) | DataValue::Float(_) => 2,
            DataValue::Text(_) => 3,
            DataValue::Json(_) => 4,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Text(s) => write!(f, "{}", s),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Boolean(b) => write!(f, "{}", b),
            DataValue::Json(v) => write!(f, "{}", v),
            DataValue::Null => write!(f, ""),
        }
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Integer(i)
    }
}

/// Total ordering over DataValues.
///
/// Integers and floats compare by numeric value. Values of different kinds
/// use the rank Null < Boolean < number < Text < Json.
pub fn compare_datavalues(a: &DataValue, b: &DataValue) -> Ordering {
    match (a, b) {
        (DataValue::Integer(a), DataValue::Integer(b)) => a.cmp(b),
        (DataValue::Float(a), DataValue::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (DataValue::Integer(i), DataValue::Float(f)) => {
            (*i as f64).partial_cmp(f).unwrap_or(Ordering::Equal)
        }
        (DataValue::Float(f), DataValue::Integer(i)) => {
            f.partial_cmp(&(*i as f64)).unwrap_or(Ordering::Equal)
        }
        (DataValue::Text(a), DataValue::Text(b)) => a.cmp(b),
        (DataValue::Boolean(a), DataValue::Boolean(b)) => a.cmp(b),
        (DataValue::Json(a), DataValue::Json(b)) => a.to_string().cmp(&b.to_string()),
        (DataValue::Null, DataValue::Null) => Ordering::Equal,
        _ => a.type_rank().cmp(&b.type_rank()),
    }
}

/// Numeric-first comparison: text that parses as a number is compared as one.
///
/// Used by numeric columns whose identifiers may arrive as strings ("10" vs "9").
/// Two integers, parsed or not, compare exactly.
pub fn compare_numeric(a: &DataValue, b: &DataValue) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => compare_datavalues(&x, &y),
        (None, None) => compare_datavalues(a, b),
        // Null < numbers < anything else
        (Some(_), None) if b.is_null() => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) if a.is_null() => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
    }
}
