use tracing::debug;

use crate::data::record::RecordId;
use crate::view::engine::ViewResult;

pub const DEFAULT_ROUTE_TEMPLATE: &str = "/users/{id}";

/// Outbound navigation capability, e.g. a router
pub trait Navigator {
    fn navigate(&mut self, id: &RecordId);
}

impl<F> Navigator for F
where
    F: FnMut(&RecordId),
{
    fn navigate(&mut self, id: &RecordId) {
        self(id)
    }
}

/// Navigator that resolves ids into detail routes and records them
#[derive(Debug, Clone)]
pub struct RouteNavigator {
    template: String,
    history: Vec<String>,
}

impl Default for RouteNavigator {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE_TEMPLATE)
    }
}

impl RouteNavigator {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            history: Vec::new(),
        }
    }

    pub fn route_for(&self, id: &RecordId) -> String {
        self.template.replace("{id}", &id.to_string())
    }

    /// Routes pushed so far, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }
}

impl Navigator for RouteNavigator {
    fn navigate(&mut self, id: &RecordId) {
        let route = self.route_for(id);
        debug!("Navigating to {}", route);
        self.history.push(route);
    }
}

/// Turns an activated row into a navigation call.
///
/// Holds no state of its own beyond the navigator it delegates to.
pub struct RowNavigationBridge<N: Navigator> {
    navigator: N,
}

impl<N: Navigator> RowNavigationBridge<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }

    pub fn on_row_activate(&mut self, id: &RecordId) {
        self.navigator.navigate(id);
    }

    /// Activate the record shown at `row` on the current page.
    /// Returns false (and does nothing) when the row is not on the page.
    pub fn activate_row(&mut self, view: &ViewResult, row: usize) -> bool {
        match view.record_id_at(row) {
            Some(id) => {
                self.navigator.navigate(id);
                true
            }
            None => {
                debug!("Row {} is not on the current page", row);
                false
            }
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn into_inner(self) -> N {
        self.navigator
    }
}
