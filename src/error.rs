//! Domain errors
//!
//! Every note, notebook, tag and reminder operation reports one of these kinds. The API layer
//! turns them into status codes, nothing is retried.

use thiserror::Error;

use crate::storage;

/// Errors of the domain operations
#[derive(Debug, Error)]
pub enum Error {
    /// The identifier is not a 24 character hexadecimal object id
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    /// No document for the given id
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A referenced notebook, tag or note does not exist
    #[error("Unknown {0}")]
    InvalidReference(&'static str),

    /// Malformed or incomplete input
    #[error("{0}")]
    Validation(String),

    /// The document store failed
    #[error(transparent)]
    Store(#[from] storage::Error),

    /// Credentials could not be verified
    #[error("{0}")]
    Auth(String),
}

/// Result type for all domain operations
pub type Result<T> = core::result::Result<T, Error>;
