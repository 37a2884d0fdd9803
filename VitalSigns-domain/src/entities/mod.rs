// Domain entities and value objects
pub mod visit;
pub mod conversions;

// Re-export common types for easier imports
pub use visit::{CreateVisitRequest, PatientId, RecordField, Visit, VisitError, VitalSign};
