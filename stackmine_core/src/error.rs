use thiserror::Error;

pub type Result<T> = std::result::Result<T, MineError>;

/// Errors raised by the support counter and the bundle clusterer.
///
/// Empty input, no qualifying seeds and fully deduplicated runs are not
/// errors; they produce an empty bundle list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MineError {
    #[error("invalid support statistics: {0}")]
    InvalidInput(String),

    #[error("invalid bundle parameters: {0}")]
    InvalidParams(String),
}
