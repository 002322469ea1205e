use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

use crate::view::columns::ColumnSet;
use crate::view::engine::ViewResult;
use crate::view::sort::SortOrder;

/// How a page is drawn in the terminal
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub use_colors: bool,
    pub page_window: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            page_window: 5,
        }
    }
}

fn header_label(columns: &ColumnSet, key: &str, view: &ViewResult) -> String {
    let label = columns
        .get(key)
        .map(|c| c.label.as_str())
        .unwrap_or(key);
    match view.sort.order_for(key) {
        SortOrder::Ascending => format!("{} ↑", label),
        SortOrder::Descending => format!("{} ↓", label),
        SortOrder::None => label.to_string(),
    }
}

/// Build the table for the current page
pub fn build_table(view: &ViewResult, columns: &ColumnSet) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut headers = vec![Cell::new("#").add_attribute(Attribute::Bold)];
    headers.extend(
        view.columns
            .iter()
            .map(|key| Cell::new(header_label(columns, key, view)).add_attribute(Attribute::Bold)),
    );
    table.set_header(headers);

    for (position, row) in view.rows.iter().enumerate() {
        let mut cells = vec![Cell::new(position + 1)];
        cells.extend(row.cells.iter().map(Cell::new));
        table.add_row(cells);
    }

    table
}

/// "Showing a-b of n"
pub fn range_label(view: &ViewResult) -> String {
    format!(
        "Showing {}-{} of {}",
        view.range_start(),
        view.range_end(),
        view.filtered_count
    )
}

/// Page buttons with the current page bracketed, 1-based
pub fn page_window_label(view: &ViewResult, max: usize) -> String {
    let pages: Vec<String> = view
        .page_window(max)
        .into_iter()
        .map(|index| {
            if index == view.page_index {
                format!("[{}]", index + 1)
            } else {
                (index + 1).to_string()
            }
        })
        .collect();

    let previous = if view.can_go_previous { "<" } else { " " };
    let next = if view.can_go_next { ">" } else { " " };
    format!(
        "{} {} {}  page {} of {}",
        previous,
        pages.join(" "),
        next,
        view.page_index + 1,
        view.page_count
    )
}

/// Message for a page without rows
pub fn empty_message(has_active_filters: bool) -> &'static str {
    if has_active_filters {
        "No users match your filters."
    } else {
        "No users found."
    }
}

/// Render the page as plain text, without colors
pub fn render_view(
    view: &ViewResult,
    columns: &ColumnSet,
    has_active_filters: bool,
    options: &DisplayOptions,
) -> String {
    if view.is_empty() {
        return empty_message(has_active_filters).to_string();
    }

    format!(
        "{}\n{}\n{}",
        build_table(view, columns),
        range_label(view),
        page_window_label(view, options.page_window)
    )
}

/// Print the page to stdout
pub fn display_view(
    view: &ViewResult,
    columns: &ColumnSet,
    has_active_filters: bool,
    options: &DisplayOptions,
) {
    if view.is_empty() {
        let message = empty_message(has_active_filters);
        if options.use_colors {
            println!("{}", message.yellow());
        } else {
            println!("{}", message);
        }
        return;
    }

    println!("{}", build_table(view, columns));
    if options.use_colors {
        println!("{}", range_label(view).green());
        println!("{}", page_window_label(view, options.page_window).cyan());
    } else {
        println!("{}", range_label(view));
        println!("{}", page_window_label(view, options.page_window));
    }
}
