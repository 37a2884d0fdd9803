use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::visit::PatientId;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No patient with this identifier
    #[error("Patient not found: {0}")]
    NotFound(PatientId),

    /// The backing data file could not be opened
    #[error("Data source unavailable: {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading or writing the data file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RepositoryError {
    /// Whether the error means the data file is missing or unreadable
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, RepositoryError::SourceUnavailable { .. })
    }
}
