//! Record model
//!
//! Cell values, the `Record` abstraction the view engine reads through, the
//! user directory record and its loaders.

pub mod datatable;
pub mod datavalue;
pub mod loaders;
pub mod record;
pub mod user;
