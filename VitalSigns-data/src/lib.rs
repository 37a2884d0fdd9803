// Vital Signs Data
// This crate holds the visit storage model, the in-memory patient store
// and the file-backed visit log

// Storage configuration
pub mod config;

// Line-oriented persisted format
pub mod line_format;

// Data storage models
pub mod models;

// Patient store and visit log implementations
pub mod repository;

pub use models::visit::{PatientId, Visit};
pub use repository::{PatientStore, RepositoryError};
