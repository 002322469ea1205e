use std::fmt;

use crate::data::datatable::DataTable;
use crate::view::columns::ColumnSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    Descending,
    #[default]
    None,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "ascending"),
            SortOrder::Descending => write!(f, "descending"),
            SortOrder::None => write!(f, "unsorted"),
        }
    }
}

/// At most one active sort column.
///
/// `column` is `None` exactly when `order` is `SortOrder::None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<String>,
    pub order: SortOrder,
}

impl SortState {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            column: Some(key.into()),
            order: SortOrder::Ascending,
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.column.is_some() && self.order != SortOrder::None
    }

    /// Order applied to `key`, `SortOrder::None` if another column (or none) is active
    pub fn order_for(&self, key: &str) -> SortOrder {
        match &self.column {
            Some(active) if active == key => self.order,
            _ => SortOrder::None,
        }
    }

    /// Next state when the header of `key` is activated.
    ///
    /// The active column cycles ascending -> descending -> none; any other
    /// column starts over at ascending.
    pub fn toggled(&self, key: &str) -> SortState {
        match self.order_for(key) {
            SortOrder::None => SortState::ascending(key),
            SortOrder::Ascending => SortState {
                column: Some(key.to_string()),
                order: SortOrder::Descending,
            },
            SortOrder::Descending => SortState::default(),
        }
    }
}

/// Stable sort of `rows` by the active column's comparator.
///
/// Rows with equal keys keep their relative input order in both directions,
/// so pages stay reproducible. An unsorted state, an unknown column or an
/// unsortable column leave `rows` untouched.
pub fn apply(
    table: &DataTable,
    mut rows: Vec<usize>,
    state: &SortState,
    columns: &ColumnSet,
) -> Vec<usize> {
    if !state.is_sorted() {
        return rows;
    }
    let Some(key) = state.column.as_deref() else {
        return rows;
    };
    let Some(col_idx) = columns.index_of(key) else {
        return rows;
    };
    let Some(column) = columns.by_index(col_idx).filter(|c| c.sortable) else {
        return rows;
    };

    let comparator = column.comparator;
    let descending = state.order == SortOrder::Descending;

    rows.sort_by(|&a, &b| {
        let (Some(cell_a), Some(cell_b)) = (table.cell(a, col_idx), table.cell(b, col_idx)) else {
            return std::cmp::Ordering::Equal;
        };
        let cmp = comparator.compare(cell_a, cell_b);
        if descending {
            cmp.reverse()
        } else {
            cmp
        }
    });

    rows
}
