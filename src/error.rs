use thiserror::Error;

/// Errors raised by the table view engine.
///
/// Most engine operations are total: unknown column keys and out of range
/// page indices are absorbed rather than reported. Only arguments that would
/// break an engine invariant end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;
