//! Error types for gap filling.

use thiserror::Error;

/// A new record instance could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot construct record: {cause}")]
pub struct ConstructionError {
    pub cause: String,
}

impl ConstructionError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

/// Errors raised by the gap filler itself.
///
/// Errors raised by a caller's generator are not wrapped in this type; see
/// [`crate::filler::try_fill_blank`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FillError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

impl FillError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        FillError::InvalidArgument {
            message: message.into(),
        }
    }
}
