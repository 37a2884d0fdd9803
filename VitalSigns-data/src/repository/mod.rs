// Repository module structure
pub mod errors;
mod in_memory;
mod storage;
mod visit_log;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::PatientStore;
pub use storage::FileStorage;
pub use visit_log::{FileVisitLog, VisitLogTrait};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use visit_log::tests;
