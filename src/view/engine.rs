use tracing::{debug, trace, warn};

use crate::data::datatable::DataTable;
use crate::data::record::{Record, RecordId};
use crate::error::Result;
use crate::view::columns::ColumnSet;
use crate::view::filter::{self, FilterState};
use crate::view::pagination::{self, PaginationState};
use crate::view::sort::{self, SortState};

/// One displayed row: the source record's position and identity plus the
/// formatted cells of the visible columns
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub source_index: usize,
    pub id: RecordId,
    pub cells: Vec<String>,
}

/// Render-ready page plus the facts needed to draw pagination controls.
///
/// Always derived from the engine state; never edited directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult {
    pub rows: Vec<ViewRow>,
    /// Visible column keys in display order, matching `ViewRow::cells`
    pub columns: Vec<String>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub page_count: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub sort: SortState,
}

impl ViewResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 1-based first row shown, 0 for an empty page
    pub fn range_start(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.page_index * self.page_size + 1
        }
    }

    /// 1-based last row shown, 0 for an empty page
    pub fn range_end(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.page_index * self.page_size + self.rows.len()
        }
    }

    /// Up to `max` page indices centred on the current page
    pub fn page_window(&self, max: usize) -> Vec<usize> {
        pagination::page_window(self.page_index, self.page_count, max)
    }

    pub fn record_id_at(&self, row: usize) -> Option<&RecordId> {
        self.rows.get(row).map(|r| &r.id)
    }
}

/// Filtered, sorted, paginated, column-selectable view over an in-memory
/// record collection.
///
/// Every mutator updates one slice of state and re-runs the whole pipeline
/// (filter, then sort, then paginate) before returning the fresh result, so
/// the page index is always valid for the current filtered count.
pub struct TableView<R: Record> {
    records: Vec<R>,
    table: DataTable,
    columns: ColumnSet,
    filter: FilterState,
    sort: SortState,
    pagination: PaginationState,
    result: ViewResult,
}

impl<R: Record> TableView<R> {
    pub fn new(records: Vec<R>, columns: ColumnSet) -> Self {
        let table = DataTable::from_records(&records, &columns);
        let mut view = Self {
            records,
            table,
            columns,
            filter: FilterState::default(),
            sort: SortState::default(),
            pagination: PaginationState::default(),
            result: ViewResult {
                rows: Vec::new(),
                columns: Vec::new(),
                total_count: 0,
                filtered_count: 0,
                page_count: 1,
                page_index: 0,
                page_size: 0,
                can_go_previous: false,
                can_go_next: false,
                sort: SortState::default(),
            },
        };
        view.recompute();
        debug!(
            "TableView created: {} records, {} columns",
            view.records.len(),
            view.columns.len()
        );
        view
    }

    pub fn with_page_size(mut self, page_size: usize) -> Result<Self> {
        self.set_page_size(page_size)?;
        Ok(self)
    }

    /// The current view result
    pub fn view(&self) -> &ViewResult {
        &self.result
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn pagination_state(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn has_active_filters(&self) -> bool {
        self.filter.is_active()
    }

    /// Records on the current page, in display order
    pub fn page_records(&self) -> Vec<&R> {
        self.result
            .rows
            .iter()
            .filter_map(|row| self.records.get(row.source_index))
            .collect()
    }

    /// Identifier of the record shown at `row` on the current page
    pub fn record_id_at(&self, row: usize) -> Option<&RecordId> {
        self.result.record_id_at(row)
    }

    pub fn set_global_query(&mut self, query: impl Into<String>) -> &ViewResult {
        self.filter.global_query = query.into();
        debug!("Global query set to '{}'", self.filter.global_query);
        self.recompute()
    }

    /// Set (or clear with an empty value) the filter of one column.
    /// Unknown or unfilterable columns are ignored.
    pub fn set_column_filter(&mut self, key: &str, value: impl Into<String>) -> &ViewResult {
        let filterable = self.columns.get(key).is_some_and(|c| c.filterable);
        if !filterable {
            debug!("Ignoring filter on unknown or unfilterable column '{}'", key);
            return &self.result;
        }

        self.filter.set_column_filter(key, value.into());
        debug!("Column filters now {:?}", self.filter.column_filters);
        self.recompute()
    }

    /// Cycle the sort of `key` through ascending, descending and unsorted.
    /// Unknown or unsortable columns are ignored.
    pub fn toggle_sort(&mut self, key: &str) -> &ViewResult {
        let sortable = self.columns.get(key).is_some_and(|c| c.sortable);
        if !sortable {
            debug!("Ignoring sort on unknown or unsortable column '{}'", key);
            return &self.result;
        }

        self.sort = self.sort.toggled(key);
        debug!("Sort on '{}' is now {}", key, self.sort.order);
        self.recompute()
    }

    /// Change the page size. Zero is rejected and leaves the state untouched.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<&ViewResult> {
        if let Err(e) = self.pagination.set_page_size(page_size) {
            warn!("Rejected page size {}: {}", page_size, e);
            return Err(e);
        }
        debug!("Page size set to {}", page_size);
        Ok(self.recompute())
    }

    /// Jump to a page; indices past the end land on the last page
    pub fn set_page_index(&mut self, page_index: usize) -> &ViewResult {
        self.pagination.page_index = page_index;
        debug!("Page index set to {}", page_index);
        self.recompute()
    }

    pub fn next_page(&mut self) -> &ViewResult {
        let next = self.pagination.page_index.saturating_add(1);
        self.set_page_index(next)
    }

    pub fn previous_page(&mut self) -> &ViewResult {
        let previous = self.pagination.page_index.saturating_sub(1);
        self.set_page_index(previous)
    }

    pub fn first_page(&mut self) -> &ViewResult {
        self.set_page_index(0)
    }

    pub fn last_page(&mut self) -> &ViewResult {
        let last = self.result.page_count.saturating_sub(1);
        self.set_page_index(last)
    }

    /// Show or hide a column. Unknown columns and hiding a non-hideable
    /// column are ignored.
    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> &ViewResult {
        if self.columns.set_visible(key, visible) {
            debug!("Column '{}' visible={}", key, visible);
            self.recompute()
        } else {
            &self.result
        }
    }

    /// Clear the global query and every column filter and go back to the
    /// first page. Sort and column visibility are kept.
    pub fn reset_filters(&mut self) -> &ViewResult {
        self.filter = FilterState::default();
        self.pagination.page_index = 0;
        debug!("Filters reset");
        self.recompute()
    }

    /// Drop the per-column filters only, keeping the global query
    pub fn clear_column_filters(&mut self) -> &ViewResult {
        self.filter.column_filters.clear();
        self.pagination.page_index = 0;
        debug!("Column filters cleared");
        self.recompute()
    }

    /// Swap in a new record collection, keeping filter, sort and visibility
    pub fn replace_records(&mut self, records: Vec<R>) -> &ViewResult {
        self.table = DataTable::from_records(&records, &self.columns);
        self.records = records;
        debug!("Replaced records: {} rows", self.records.len());
        self.recompute()
    }

    fn recompute(&mut self) -> &ViewResult {
        let filtered = filter::apply(&self.table, &self.filter, &self.columns);
        let filtered_count = filtered.len();
        let sorted = sort::apply(&self.table, filtered, &self.sort, &self.columns);
        let slice = pagination::apply(sorted.len(), &self.pagination);

        if slice.page_index != self.pagination.page_index {
            debug!(
                "Clamping page index {} -> {}",
                self.pagination.page_index, slice.page_index
            );
            self.pagination.page_index = slice.page_index;
        }

        let visible = self.columns.visible_indices();
        let rows = sorted[slice.range.clone()]
            .iter()
            .filter_map(|&source_index| {
                let row = self.table.row(source_index)?;
                Some(ViewRow {
                    source_index,
                    id: row.id.clone(),
                    cells: visible
                        .iter()
                        .map(|&col| row.get(col).map(|c| c.text.clone()).unwrap_or_default())
                        .collect(),
                })
            })
            .collect::<Vec<_>>();

        trace!(
            "Pipeline: {} total -> {} filtered -> page {}/{} ({} rows)",
            self.table.row_count(),
            filtered_count,
            slice.page_index + 1,
            slice.page_count,
            rows.len()
        );

        self.result = ViewResult {
            rows,
            columns: self.columns.visible_keys(),
            total_count: self.table.row_count(),
            filtered_count,
            page_count: slice.page_count,
            page_index: slice.page_index,
            page_size: self.pagination.page_size(),
            can_go_previous: slice.page_index > 0,
            can_go_next: slice.page_index + 1 < slice.page_count,
            sort: self.sort.clone(),
        };
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewError;
    use crate::view::columns::{ColumnDescriptor, Comparator};
    use crate::view::sort::SortOrder;
    use serde_json::{json, Value};

    fn people(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| {
                json!({
                    "id": i as i64 + 1,
                    "name": format!("person {:02}", i + 1),
                    "group": if i % 2 == 0 { "even" } else { "odd" },
                })
            })
            .collect()
    }

    fn columns() -> ColumnSet {
        ColumnSet::new(vec![
            ColumnDescriptor::new("id", "ID")
                .with_comparator(Comparator::Numeric)
                .with_hideable(false),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("group", "Group"),
        ])
        .unwrap()
    }

    #[test]
    fn test_initial_view() {
        let view = TableView::new(people(12), columns());
        let result = view.view();
        assert_eq!(result.total_count, 12);
        assert_eq!(result.filtered_count, 12);
        assert_eq!(result.page_size, 10);
        assert_eq!(result.page_count, 2);
        assert_eq!(result.rows.len(), 10);
        assert!(!result.can_go_previous);
        assert!(result.can_go_next);
        assert_eq!(result.columns, vec!["id", "name", "group"]);
    }

    #[test]
    fn test_filter_shrink_clamps_page_index() {
        let mut view = TableView::new(people(12), columns()).with_page_size(5).unwrap();
        assert_eq!(view.view().page_count, 3);
        view.set_page_index(2);
        assert_eq!(view.view().page_index, 2);

        let result = view.set_global_query("EVEN");
        assert_eq!(result.filtered_count, 6);
        assert_eq!(result.page_count, 2);
        assert_eq!(result.page_index, 1);
        assert_eq!(view.pagination_state().page_index, 1);
    }

    #[test]
    fn test_zero_page_size_leaves_state_unchanged() {
        let mut view = TableView::new(people(12), columns()).with_page_size(5).unwrap();
        view.set_page_index(1);
        let before = view.view().clone();

        let err = view.set_page_size(0).unwrap_err();
        assert!(matches!(err, ViewError::InvalidArgument(_)));
        assert_eq!(view.view(), &before);
        assert_eq!(view.pagination_state().page_size(), 5);
        assert_eq!(view.pagination_state().page_index, 1);
    }

    #[test]
    fn test_sort_cycle_restores_input_order() {
        let mut view = TableView::new(people(6), columns());
        let original: Vec<RecordId> = view.view().rows.iter().map(|r| r.id.clone()).collect();

        view.toggle_sort("name");
        view.toggle_sort("name");
        let descending: Vec<RecordId> = view.view().rows.iter().map(|r| r.id.clone()).collect();
        assert_eq!(descending.first(), Some(&RecordId::Number(6)));

        view.toggle_sort("name");
        assert_eq!(view.sort_state().order, SortOrder::None);
        let restored: Vec<RecordId> = view.view().rows.iter().map(|r| r.id.clone()).collect();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_unknown_keys_are_noops() {
        let mut view = TableView::new(people(3), columns());
        let before = view.view().clone();
        view.toggle_sort("missing");
        view.set_column_filter("missing", "x");
        view.set_column_visible("missing", false);
        assert_eq!(view.view(), &before);
        assert!(!view.has_active_filters());
    }

    #[test]
    fn test_reset_filters_keeps_sort_and_visibility() {
        let mut view = TableView::new(people(12), columns()).with_page_size(5).unwrap();
        view.toggle_sort("id");
        view.set_column_visible("group", false);
        view.set_column_filter("name", "person 1");
        view.set_page_index(1);

        let result = view.reset_filters().clone();
        assert_eq!(result.page_index, 0);
        assert_eq!(result.filtered_count, 12);
        assert_eq!(result.columns, vec!["id", "name"]);
        assert_eq!(view.sort_state(), &SortState::ascending("id"));

        view.reset_filters();
        assert_eq!(view.view(), &result);
    }

    #[test]
    fn test_page_navigation_is_clamped() {
        let mut view = TableView::new(people(12), columns()).with_page_size(5).unwrap();
        view.previous_page();
        assert_eq!(view.view().page_index, 0);
        view.last_page();
        assert_eq!(view.view().page_index, 2);
        assert_eq!(view.view().rows.len(), 2);
        view.next_page();
        assert_eq!(view.view().page_index, 2);
        assert!(!view.view().can_go_next);
        view.first_page();
        assert_eq!(view.view().range_start(), 1);
        assert_eq!(view.view().range_end(), 5);
    }

    #[test]
    fn test_hidden_column_drops_cells_and_global_match() {
        let mut view = TableView::new(people(4), columns());
        view.set_column_visible("group", false);
        assert_eq!(view.view().rows[0].cells.len(), 2);
        assert_eq!(view.set_global_query("odd").filtered_count, 0);

        // identity columns cannot be hidden
        view.set_column_visible("id", false);
        assert_eq!(view.view().columns, vec!["id", "name"]);
    }

    #[test]
    fn test_empty_result_is_one_empty_page() {
        let mut view = TableView::new(people(4), columns());
        let result = view.set_global_query("nobody");
        assert_eq!(result.filtered_count, 0);
        assert_eq!(result.page_count, 1);
        assert_eq!(result.page_index, 0);
        assert!(result.is_empty());
        assert_eq!(result.range_start(), 0);
        assert!(!result.can_go_next);
        assert!(!result.can_go_previous);
    }

    #[test]
    fn test_replace_records_reclamps() {
        let mut view = TableView::new(people(12), columns()).with_page_size(5).unwrap();
        view.last_page();
        let result = view.replace_records(people(3));
        assert_eq!(result.total_count, 3);
        assert_eq!(result.page_index, 0);
        assert_eq!(view.page_records().len(), 3);
    }

    #[test]
    fn test_page_moves_are_logged() {
        use crate::logging::{LogRingBuffer, RingBufferWriter};
        use tracing_subscriber::layer::SubscriberExt;

        let buffer = LogRingBuffer::new();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(RingBufferWriter::new(buffer.clone()))
                .with_ansi(false)
                .without_time()
                .compact(),
        );

        let mut view = TableView::new(people(12), columns()).with_page_size(5).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            view.set_page_index(1);
            view.last_page();
        });

        let messages: Vec<String> = buffer.get_recent(50).into_iter().map(|e| e.message).collect();
        assert!(messages.iter().any(|m| m.contains("Page index set to 1")));
        assert!(messages.iter().any(|m| m.contains("Page index set to 2")));
    }

    #[test]
    fn test_numeric_sort_orders_ids_beyond_f64_precision() {
        let records = vec![
            json!({"id": 9_007_199_254_740_993i64, "name": "later", "group": "odd"}),
            json!({"id": 9_007_199_254_740_992i64, "name": "earlier", "group": "even"}),
        ];
        let mut view = TableView::new(records, columns());
        view.toggle_sort("id");

        let ids: Vec<RecordId> = view.view().rows.iter().map(|r| r.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                RecordId::Number(9_007_199_254_740_992),
                RecordId::Number(9_007_199_254_740_993)
            ]
        );
    }

    #[test]
    fn test_clear_column_filters_keeps_global_query() {
        let mut view = TableView::new(people(12), columns());
        view.set_global_query("odd");
        view.set_column_filter("name", "person 0");
        assert_eq!(view.view().filtered_count, 4);

        let result = view.clear_column_filters();
        assert_eq!(result.filtered_count, 6);
        assert_eq!(view.filter_state().global_query, "odd");
    }
}
