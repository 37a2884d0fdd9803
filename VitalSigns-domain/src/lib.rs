// Vital Signs Domain
// This crate contains the validation, ingestion, aggregation and query logic for patient visits

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Re-export the data layer for convenience
pub use vital_signs_data as data;

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
