use thiserror::Error;

/// Errors that can occur while reading or writing the CSV archive.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error (directory creation, file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
