use thiserror::Error;

use tickvault_core::{SourceError, StoreError, ValidationError};

/// Errors surfaced at the binary boundary.
///
/// None of these are fatal to the process: `main` logs whatever escapes a
/// command and still exits 0.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}
