pub mod command;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod table_display;
pub mod view;

pub use data::datavalue::DataValue;
pub use data::record::{Record, RecordId};
pub use data::user::{user_columns, User};
pub use error::{Result, ViewError};
pub use view::{
    ColumnDescriptor, ColumnSet, Comparator, FilterState, Formatter, Navigator, PaginationState,
    RouteNavigator, RowNavigationBridge, SortOrder, SortState, TableView, ViewResult, ViewRow,
};
