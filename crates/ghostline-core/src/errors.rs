//! Shared error types used at crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid workflow state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
