use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::line_format::{self, RewriteFormat};
use crate::models::visit::{PatientId, Visit};
use super::errors::RepositoryError;
use super::in_memory::PatientStore;
use super::storage::FileStorage;

/// Persistent log of visits backing the in-memory store
pub trait VisitLogTrait {
    /// Read the raw record lines of the log
    fn read_lines(&self) -> Result<Vec<String>, RepositoryError>;

    /// Persist one new visit
    fn append(&mut self, patient_id: PatientId, visit: &Visit) -> Result<(), RepositoryError>;

    /// Replace the persisted log with the contents of the store
    fn rewrite(&mut self, store: &PatientStore) -> Result<(), RepositoryError>;

    /// Human-readable location of the log
    fn location(&self) -> String;
}

/// Visit log stored in a flat text file
#[derive(Debug, Clone)]
pub struct FileVisitLog {
    path: PathBuf,
    rewrite_format: RewriteFormat,
}

impl FileVisitLog {
    /// Create a log for the given file
    pub fn new(path: impl Into<PathBuf>, rewrite_format: RewriteFormat) -> Self {
        Self {
            path: path.into(),
            rewrite_format,
        }
    }

    /// Create a log from the storage configuration
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.data_file.clone(), config.rewrite_format)
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format used by [`VisitLogTrait::rewrite`]
    pub fn rewrite_format(&self) -> RewriteFormat {
        self.rewrite_format
    }
}

impl VisitLogTrait for FileVisitLog {
    fn read_lines(&self) -> Result<Vec<String>, RepositoryError> {
        FileStorage::read_lines(&self.path)
    }

    fn append(&mut self, patient_id: PatientId, visit: &Visit) -> Result<(), RepositoryError> {
        let line = line_format::format_visit_line(patient_id, visit);
        FileStorage::append_line(&self.path, &line)
    }

    fn rewrite(&mut self, store: &PatientStore) -> Result<(), RepositoryError> {
        let contents = line_format::render_store(store, self.rewrite_format);
        FileStorage::replace_contents(&self.path, &contents)?;
        info!(
            "Rewrote {} with {} visits ({} format)",
            self.path.display(),
            store.visit_count(),
            self.rewrite_format
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Mock visit log for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;

    /// Visit log kept in memory that records every write
    #[derive(Debug, Clone, Default)]
    pub struct RecordingVisitLog {
        lines: Option<Vec<String>>,
        /// Every appended visit, in order
        pub appended: Vec<(PatientId, Visit)>,
        /// Contents of every rewrite, rendered as record lines
        pub rewrites: Vec<String>,
        fail_writes: bool,
    }

    impl RecordingVisitLog {
        /// Create a log whose source does not exist
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a log whose source holds the given lines
        pub fn with_lines<I, S>(lines: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                lines: Some(lines.into_iter().map(Into::into).collect()),
                ..Self::default()
            }
        }

        /// Configure the log to fail every write
        pub fn with_write_failure(mut self) -> Self {
            self.fail_writes = true;
            self
        }

        fn check_writable(&self) -> Result<(), RepositoryError> {
            if self.fail_writes {
                debug!("Recording log configured to fail writes");
                return Err(RepositoryError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "log is read-only",
                )));
            }
            Ok(())
        }
    }

    impl VisitLogTrait for RecordingVisitLog {
        fn read_lines(&self) -> Result<Vec<String>, RepositoryError> {
            self.lines
                .clone()
                .ok_or_else(|| RepositoryError::SourceUnavailable {
                    path: PathBuf::from(self.location()),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "no lines configured",
                    ),
                })
        }

        fn append(&mut self, patient_id: PatientId, visit: &Visit) -> Result<(), RepositoryError> {
            self.check_writable()?;
            self.appended.push((patient_id, visit.clone()));
            Ok(())
        }

        fn rewrite(&mut self, store: &PatientStore) -> Result<(), RepositoryError> {
            self.check_writable()?;
            self.rewrites
                .push(line_format::render_store(store, RewriteFormat::Lines));
            Ok(())
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }
}
