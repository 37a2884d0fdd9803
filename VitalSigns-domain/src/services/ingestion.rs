use std::fmt;

use tracing::{debug, info, warn};

use crate::entities::conversions;
use crate::entities::visit::{PatientId, Visit, VisitError};
use crate::services::validation;
use vital_signs_data::line_format::{self, RECORD_FIELD_COUNT};
use vital_signs_data::repository::{PatientStore, RepositoryError, VisitLogTrait};

/// A rejected line and the reason it was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct IngestDiagnostic {
    /// 1-based line number in the source
    pub line: usize,
    /// Why the line was rejected
    pub error: VisitError,
}

impl fmt::Display for IngestDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in line: {}", self.error, self.line)
    }
}

/// Outcome of loading visits from a line source
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Store holding every accepted visit
    pub store: PatientStore,
    /// Lines that were skipped
    pub diagnostics: Vec<IngestDiagnostic>,
    /// Set when the source could not be opened; the store is then empty
    pub source_unavailable: Option<String>,
}

/// Parse one record line into a patient identifier and a validated visit
pub fn parse_record(line: &str) -> Result<(PatientId, Visit), VisitError> {
    let fields = line_format::split_fields(line);
    if fields.len() != RECORD_FIELD_COUNT {
        return Err(VisitError::MalformedLine(fields.len()));
    }

    let patient_id = conversions::parse_patient_id(fields[0])?;
    let visit = validation::validate_fields(&fields[1..])?;
    Ok((patient_id, visit))
}

/// Load visits from a sequence of raw lines
///
/// Invalid lines are skipped and reported; they never stop the load.
pub fn ingest_lines<I, S>(lines: I) -> IngestReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = IngestReport::default();

    for (index, line) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        match parse_record(line.as_ref()) {
            Ok((patient_id, visit)) => report.store.upsert_visit(patient_id, visit),
            Err(error) => {
                debug!("Skipping line {}: {}", line_number, error);
                report.diagnostics.push(IngestDiagnostic {
                    line: line_number,
                    error,
                });
            }
        }
    }

    if !report.diagnostics.is_empty() {
        warn!("Skipped {} invalid visit lines", report.diagnostics.len());
    }
    info!(
        "Loaded {} visits for {} patients",
        report.store.visit_count(),
        report.store.patient_count()
    );

    report
}

/// Load visits from a visit log
///
/// A log whose source cannot be opened yields an empty store. Any other read
/// failure is returned to the caller.
pub fn ingest_from_log<L: VisitLogTrait>(log: &L) -> Result<IngestReport, RepositoryError> {
    match log.read_lines() {
        Ok(lines) => Ok(ingest_lines(lines)),
        Err(e) if e.is_source_unavailable() => {
            warn!("Starting with an empty store: {}", e);
            Ok(IngestReport {
                source_unavailable: Some(log.location()),
                ..IngestReport::default()
            })
        }
        Err(e) => Err(e),
    }
}
