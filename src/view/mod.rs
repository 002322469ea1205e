//! Table view engine
//!
//! Composes the filter, sort and pagination stages over an in-memory record
//! collection and maps visible rows back to record identities.

pub mod columns;
pub mod engine;
pub mod filter;
pub mod navigation;
pub mod pagination;
pub mod sort;

pub use columns::{ColumnDescriptor, ColumnSet, Comparator, Formatter};
pub use engine::{TableView, ViewResult, ViewRow};
pub use filter::FilterState;
pub use navigation::{Navigator, RouteNavigator, RowNavigationBridge};
pub use pagination::PaginationState;
pub use sort::{SortOrder, SortState};
