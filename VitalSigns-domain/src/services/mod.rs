pub mod validation;
pub mod ingestion;
pub mod insights;
pub mod query;
pub mod patient_records;

// Domain services
// This module contains business logic implementations.

// Re-export service types and entry points
pub use ingestion::{ingest_from_log, ingest_lines, IngestDiagnostic, IngestReport};
pub use insights::{compute_stats, StatsScope, VitalStatistics};
pub use patient_records::{LoadSummary, PatientRecordService, PatientServiceError};
pub use query::{
    find_patients_needing_follow_up, find_visits_by_date, FollowUpReason, VisitDateFilter,
};
pub use validation::{validate_fields, validate_request};
