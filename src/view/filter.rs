use std::collections::BTreeMap;

use crate::data::datatable::DataTable;
use crate::view::columns::ColumnSet;

/// Global free-text query plus per-column predicates.
///
/// An empty string means "no constraint" everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub global_query: String,
    pub column_filters: BTreeMap<String, String>,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        !self.global_query.is_empty() || self.column_filters.values().any(|v| !v.is_empty())
    }

    /// Set or clear (empty value) the filter for one column
    pub fn set_column_filter(&mut self, key: &str, value: String) {
        if value.is_empty() {
            self.column_filters.remove(key);
        } else {
            self.column_filters.insert(key.to_string(), value);
        }
    }
}

/// Reduce `table` to the rows matching the global query and every active
/// column filter, preserving source order.
///
/// The global query is matched against the visible, filterable columns; a row
/// matches if any of them contains it. Column filters are ANDed together and
/// with the global query. Filters on unknown or unfilterable columns are
/// ignored. All matching is a case-insensitive substring test on the
/// formatted cell text.
pub fn apply(table: &DataTable, state: &FilterState, columns: &ColumnSet) -> Vec<usize> {
    let global = state.global_query.to_lowercase();
    let global_columns: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.visible && c.filterable)
        .map(|(idx, _)| idx)
        .collect();

    let column_predicates: Vec<(usize, String)> = state
        .column_filters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .filter_map(|(key, value)| {
            let idx = columns.index_of(key)?;
            columns
                .by_index(idx)
                .filter(|c| c.filterable)
                .map(|_| (idx, value.to_lowercase()))
        })
        .collect();

    (0..table.row_count())
        .filter(|&row| {
            let global_match = global.is_empty()
                || global_columns.iter().any(|&col| {
                    table
                        .cell(row, col)
                        .map(|cell| cell.folded.contains(&global))
                        .unwrap_or(false)
                });

            global_match
                && column_predicates.iter().all(|(col, needle)| {
                    table
                        .cell(row, *col)
                        .map(|cell| cell.folded.contains(needle.as_str()))
                        .unwrap_or(false)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::columns::ColumnDescriptor;
    use serde_json::{json, Value};

    fn fixture() -> (DataTable, ColumnSet) {
        let records: Vec<Value> = vec![
            json!({"id": 1, "name": "Leanne Graham", "email": "Sincere@april.biz"}),
            json!({"id": 2, "name": "Ervin Howell", "email": "Shanna@melissa.tv"}),
            json!({"id": 3, "name": "Clementine Bauch", "email": "Nathan@yesenia.net"}),
            json!({"id": 4, "name": "Patricia Lebsack", "email": "Julianne.OConner@kory.org"}),
        ];
        let columns = ColumnSet::new(vec![
            ColumnDescriptor::new("id", "ID"),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("email", "Email"),
        ])
        .unwrap();
        (DataTable::from_records(&records, &columns), columns)
    }

    #[test]
    fn test_empty_state_keeps_everything() {
        let (table, columns) = fixture();
        assert_eq!(
            apply(&table, &FilterState::default(), &columns),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_global_query_case_insensitive_any_column() {
        let (table, columns) = fixture();
        let state = FilterState {
            global_query: "BIZ".to_string(),
            ..Default::default()
        };
        assert_eq!(apply(&table, &state, &columns), vec![0]);

        let state = FilterState {
            global_query: "an".to_string(),
            ..Default::default()
        };
        // "Leanne", "Shanna", "Nathan"/"Clementine", "Julianne"
        assert_eq!(apply(&table, &state, &columns), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_global_query_skips_hidden_columns() {
        let (table, mut columns) = fixture();
        columns.set_visible("email", false);
        let state = FilterState {
            global_query: "biz".to_string(),
            ..Default::default()
        };
        assert!(apply(&table, &state, &columns).is_empty());
    }

    #[test]
    fn test_column_filters_and_global_are_anded() {
        let (table, columns) = fixture();
        let mut state = FilterState::default();
        state.set_column_filter("name", "n".to_string());
        assert_eq!(apply(&table, &state, &columns), vec![0, 1, 2]);

        state.global_query = "net".to_string();
        assert_eq!(apply(&table, &state, &columns), vec![2]);
    }

    #[test]
    fn test_unknown_filter_key_is_ignored() {
        let (table, columns) = fixture();
        let mut state = FilterState::default();
        state.set_column_filter("nope", "zzz".to_string());
        assert_eq!(apply(&table, &state, &columns).len(), 4);
    }

    #[test]
    fn test_numbers_filter_on_formatted_text() {
        let (table, columns) = fixture();
        let mut state = FilterState::default();
        state.set_column_filter("id", "3".to_string());
        assert_eq!(apply(&table, &state, &columns), vec![2]);
    }

    #[test]
    fn test_empty_value_clears_column_filter() {
        let mut state = FilterState::default();
        state.set_column_filter("name", "x".to_string());
        assert!(state.is_active());
        state.set_column_filter("name", String::new());
        assert!(!state.is_active());
        assert!(state.column_filters.is_empty());
    }
}
