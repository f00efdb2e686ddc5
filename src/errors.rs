//! Error types for the instance pool

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Pool has been disposed")]
    Disposed,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Factory failed: {0}")]
    FactoryFailed(String),
}

impl PoolError {
    /// Shorthand for [`PoolError::InvalidArgument`]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Shorthand for [`PoolError::FactoryFailed`], for use by factory implementations
    pub fn factory(message: impl std::fmt::Display) -> Self {
        Self::FactoryFailed(message.to_string())
    }
}

pub type PoolResult<T> = Result<T, PoolError>;
