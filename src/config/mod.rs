//! Configuration module
//!
//! Display and behavior settings stored as TOML in the user's config directory.

pub mod config;
