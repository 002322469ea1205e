//! Column descriptors: which fields are shown, how each is labeled, and which
//! named formatter and comparator the pipeline applies to it.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::data::datatable::DataCell;
use crate::data::datavalue::{compare_numeric, DataValue};
use crate::error::{Result, ViewError};

/// Canonical stringification of a column's raw value.
///
/// Filtering only ever sees the output of a formatter, never the raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    Plain,
    /// Read a dot separated member out of a nested value before display
    Member(String),
    Lowercase,
}

impl Formatter {
    pub fn format(&self, value: &DataValue) -> String {
        match self {
            Formatter::Plain => value.to_string(),
            Formatter::Member(path) => value.member(path).to_string(),
            Formatter::Lowercase => value.to_string().to_lowercase(),
        }
    }
}

/// How two cells of the same column are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Case-insensitive comparison of the formatted text
    Text,
    /// Numeric comparison of the raw value, numeric-looking text included
    Numeric,
    /// Formatted text with digit runs compared as numbers ("u2" < "u10")
    Natural,
}

impl Comparator {
    pub fn compare(&self, a: &DataCell, b: &DataCell) -> Ordering {
        match self {
            Comparator::Text => compare_text(a, b),
            Comparator::Numeric => compare_numeric(&a.value, &b.value),
            Comparator::Natural => compare_natural(&a.text, &b.text),
        }
    }
}

// Folded text is computed once per cell when the table is built
fn compare_text(a: &DataCell, b: &DataCell) -> Ordering {
    a.folded.cmp(&b.folded).then_with(|| a.text.cmp(&b.text))
}

fn compare_natural(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let lhs = take_digits(&mut left);
                let rhs = take_digits(&mut right);
                let ord = lhs
                    .trim_start_matches('0')
                    .len()
                    .cmp(&rhs.trim_start_matches('0').len())
                    .then_with(|| lhs.trim_start_matches('0').cmp(rhs.trim_start_matches('0')));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

/// Static description of one displayed field
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub filterable: bool,
    pub visible: bool,
    /// Whether the operator may hide this column
    pub hideable: bool,
    pub formatter: Formatter,
    pub comparator: Comparator,
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            filterable: true,
            visible: true,
            hideable: true,
            formatter: Formatter::Plain,
            comparator: Comparator::Text,
        }
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_hideable(mut self, hideable: bool) -> Self {
        self.hideable = hideable;
        self
    }

    pub fn format(&self, value: &DataValue) -> String {
        self.formatter.format(value)
    }
}

/// The fixed, ordered set of columns for one engine instance
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnSet {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(ViewError::InvalidArgument(format!(
                    "duplicate column key '{}'",
                    column.key
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn by_index(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    /// Set a column's visibility; returns false if nothing changed
    pub(crate) fn set_visible(&mut self, key: &str, visible: bool) -> bool {
        match self.columns.iter_mut().find(|c| c.key == key) {
            Some(column) if column.visible != visible && (visible || column.hideable) => {
                column.visible = visible;
                true
            }
            _ => false,
        }
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.visible)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn visible_keys(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.key.clone())
            .collect()
    }

    /// Columns the operator can toggle, in display order
    pub fn hideable(&self) -> Vec<&ColumnDescriptor> {
        self.columns.iter().filter(|c| c.hideable).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = ColumnSet::new(vec![
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("name", "Other"),
        ]);
        assert!(matches!(result, Err(ViewError::InvalidArgument(_))));
    }

    #[test]
    fn test_member_formatter() {
        let company = DataValue::from_json(&json!({"name": "Deckow-Crist"}));
        let formatter = Formatter::Member("name".to_string());
        assert_eq!(formatter.format(&company), "Deckow-Crist");
        assert_eq!(Formatter::Plain.format(&DataValue::Null), "");
        assert_eq!(
            Formatter::Lowercase.format(&DataValue::from("MiXeD")),
            "mixed"
        );
    }

    #[test]
    fn test_text_comparator_ignores_case() {
        let cell = |s: &str| DataCell::new(DataValue::from(s), s.to_string());
        assert_eq!(
            Comparator::Text.compare(&cell("alice"), &cell("Bob")),
            Ordering::Less
        );
        assert_eq!(
            Comparator::Text.compare(&cell("BOB"), &cell("bob")),
            Ordering::Less
        );
        assert_eq!(
            Comparator::Text.compare(&cell("bob"), &cell("bob")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_text_comparator_uses_folded_text() {
        // Ordering follows the folded key, the display text only breaks ties
        let mut a = DataCell::new(DataValue::from("Zed"), "Zed".to_string());
        a.folded = "aaa".to_string();
        let b = DataCell::new(DataValue::from("Amy"), "Amy".to_string());
        assert_eq!(Comparator::Text.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_natural_comparator() {
        assert_eq!(compare_natural("user2", "user10"), Ordering::Less);
        assert_eq!(compare_natural("user10", "user10"), Ordering::Equal);
        assert_eq!(compare_natural("abc", "abd"), Ordering::Less);
        assert_eq!(compare_natural("a", "a1"), Ordering::Less);
        assert_eq!(compare_natural("User2", "user10"), Ordering::Less);
        assert_eq!(compare_natural("User2", "user2"), Ordering::Less);
    }

    #[test]
    fn test_hidden_column_rules() {
        let mut columns = ColumnSet::new(vec![
            ColumnDescriptor::new("id", "ID").with_hideable(false),
            ColumnDescriptor::new("email", "Email"),
        ])
        .unwrap();

        assert!(!columns.set_visible("id", false));
        assert!(columns.set_visible("email", false));
        assert!(!columns.set_visible("email", false));
        assert!(!columns.set_visible("unknown", false));
        assert_eq!(columns.visible_keys(), vec!["id"]);
        assert_eq!(columns.hideable().len(), 1);
    }
}
