//! Error types
//!
//! Only the "set" action reports an error to the user. Store failures are
//! logged and swallowed at the `KeyValueStore` boundary, and an unparseable
//! date is skipped silently on every tick.

use std::path::PathBuf;
use thiserror::Error;

use crate::consts::MISSING_INPUT_ALERT;

/// Rejection of a "set" action. Nothing is mutated when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetError {
    /// Event name (after trimming) or date was empty
    #[error("{}", MISSING_INPUT_ALERT)]
    MissingInput,
}

/// Failure of a backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed store contents: {0}")]
    Json(#[from] serde_json::Error),
}
