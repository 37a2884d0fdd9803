use thiserror::Error;
use tracing::{error, info};

use crate::entities::visit::{CreateVisitRequest, PatientId, Visit, VisitError};
use crate::services::ingestion::{self, IngestDiagnostic};
use crate::services::insights::{self, StatsScope, VitalStatistics};
use crate::services::query::{self, FollowUpReason, VisitDateFilter};
use crate::services::validation;
use vital_signs_data::repository::{PatientStore, RepositoryError, VisitLogTrait};

/// Patient record service errors
#[derive(Debug, Error)]
pub enum PatientServiceError {
    /// The visit was rejected by validation
    #[error("Validation error: {0}")]
    Validation(#[from] VisitError),

    /// Unknown patient
    #[error("Patient ID {0} not found")]
    NotFound(PatientId),

    /// Nothing to aggregate
    #[error("{0}")]
    NoData(String),

    /// Identifier not allowed here
    #[error("Invalid patient identifier {0}: expected a positive integer")]
    InvalidIdentifier(i64),

    /// The data file could not be opened
    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    /// Reading or writing the data file failed
    #[error("Repository error: {0}")]
    Repository(String),
}

/// What happened while loading the visit log
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    /// Lines skipped during ingestion
    pub diagnostics: Vec<IngestDiagnostic>,
    /// Location of the log when it could not be opened
    pub source_unavailable: Option<String>,
}

/// Patient record service owning the in-memory store and its persistent log
pub struct PatientRecordService<L: VisitLogTrait> {
    store: PatientStore,
    log: L,
}

impl<L: VisitLogTrait> PatientRecordService<L> {
    /// Create a service over an existing store
    pub fn new(store: PatientStore, log: L) -> Self {
        Self { store, log }
    }

    /// Create a service by ingesting every visit of the log
    ///
    /// A log that cannot be opened gives an empty store and is reported in the summary.
    pub fn load(log: L) -> Result<(Self, LoadSummary), PatientServiceError> {
        let report = ingestion::ingest_from_log(&log).map_err(map_repo_error)?;
        let summary = LoadSummary {
            diagnostics: report.diagnostics,
            source_unavailable: report.source_unavailable,
        };
        Ok((Self::new(report.store, log), summary))
    }

    /// The in-memory store
    pub fn store(&self) -> &PatientStore {
        &self.store
    }

    /// The persistent log
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Validate and record a new visit, then append it to the log
    ///
    /// The visit stays in memory even if the append fails.
    pub fn add_visit(
        &mut self,
        patient_id: PatientId,
        request: CreateVisitRequest,
    ) -> Result<Visit, PatientServiceError> {
        let visit = validation::validate_request(&request)?;

        self.store.upsert_visit(patient_id, visit.clone());
        self.log.append(patient_id, &visit).map_err(|e| {
            error!("Failed to persist visit for patient {}: {}", patient_id, e);
            map_repo_error(e)
        })?;

        info!("Visit saved for patient {}", patient_id);
        Ok(visit)
    }

    /// Delete every visit of a patient and rewrite the log
    ///
    /// Returns the number of visits removed.
    pub fn delete_visits(&mut self, patient_id: PatientId) -> Result<usize, PatientServiceError> {
        let removed = self.store.clear_visits(patient_id).map_err(map_repo_error)?;

        self.log.rewrite(&self.store).map_err(|e| {
            error!("Failed to rewrite {} after deleting visits: {}", self.log.location(), e);
            map_repo_error(e)
        })?;

        info!("Deleted {} visits of patient {}", removed, patient_id);
        Ok(removed)
    }

    /// Visits of one patient in arrival order
    pub fn patient_visits(&self, patient_id: PatientId) -> Result<&[Visit], PatientServiceError> {
        self.store.get_visits(patient_id).map_err(map_repo_error)
    }

    /// Every patient with its visits
    pub fn patients(&self) -> impl Iterator<Item = (PatientId, &[Visit])> + '_ {
        self.store.all_patients()
    }

    /// Mean vital signs for a scope
    pub fn statistics(&self, scope: StatsScope) -> Result<VitalStatistics, PatientServiceError> {
        insights::compute_stats(&self.store, scope)
    }

    /// Mean vital signs for a raw identifier where 0 means all patients
    pub fn statistics_for(
        &self,
        raw_patient_id: i64,
    ) -> Result<VitalStatistics, PatientServiceError> {
        let scope = StatsScope::from_raw(raw_patient_id)?;
        self.statistics(scope)
    }

    /// Visits matching a year/month filter
    pub fn visits_by_date(
        &self,
        filter: VisitDateFilter,
    ) -> impl Iterator<Item = (PatientId, &Visit)> + '_ {
        query::find_visits_by_date(&self.store, filter)
    }

    /// Patients that need a follow-up visit, with the reason from their first qualifying visit
    pub fn patients_needing_follow_up(&self) -> Vec<(PatientId, FollowUpReason)> {
        query::find_patients_needing_follow_up(&self.store)
            .filter_map(|patient_id| {
                let visits = self.store.get_visits(patient_id).ok()?;
                query::first_follow_up_reason(visits).map(|reason| (patient_id, reason))
            })
            .collect()
    }
}

/// Map repository errors to service errors
fn map_repo_error(err: RepositoryError) -> PatientServiceError {
    match err {
        RepositoryError::NotFound(patient_id) => PatientServiceError::NotFound(patient_id),
        RepositoryError::SourceUnavailable { .. } => {
            PatientServiceError::SourceUnavailable(err.to_string())
        }
        RepositoryError::Io(_) => PatientServiceError::Repository(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::visit::VitalSign;
    use chrono::NaiveDate;
    use mockall::mock;
    use mockall::predicate::eq;
    use vital_signs_data::repository::tests::RecordingVisitLog;

    mock! {
        pub VisitLog {}

        impl VisitLogTrait for VisitLog {
            fn read_lines(&self) -> Result<Vec<String>, RepositoryError>;
            fn append(
                &mut self,
                patient_id: PatientId,
                visit: &Visit,
            ) -> Result<(), RepositoryError>;
            fn rewrite(&mut self, store: &PatientStore) -> Result<(), RepositoryError>;
            fn location(&self) -> String;
        }
    }

    fn patient(raw: u32) -> PatientId {
        PatientId::new(raw).unwrap()
    }

    fn request(heart_rate: i64) -> CreateVisitRequest {
        CreateVisitRequest {
            date: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
            temperature: 36.7,
            heart_rate,
            respiratory_rate: 16,
            systolic_bp: 122,
            diastolic_bp: 81,
            oxygen_saturation: 97,
        }
    }

    fn loaded(lines: &[&str]) -> PatientRecordService<RecordingVisitLog> {
        let log = RecordingVisitLog::with_lines(lines.iter().copied());
        let (service, _) = PatientRecordService::load(log).unwrap();
        service
    }

    #[test]
    fn test_add_visit_appends_to_log() {
        let mut log = MockVisitLog::new();
        log.expect_append()
            .withf(|patient_id, visit| patient_id.get() == 3 && visit.heart_rate == 75)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut service = PatientRecordService::new(PatientStore::new(), log);
        let visit = service.add_visit(patient(3), request(75)).unwrap();

        assert_eq!(service.patient_visits(patient(3)).unwrap(), &[visit]);
    }

    #[test]
    fn test_add_invalid_visit_touches_nothing() {
        let mut log = MockVisitLog::new();
        log.expect_append().never();

        let mut service = PatientRecordService::new(PatientStore::new(), log);
        let result = service.add_visit(patient(3), request(200));

        assert!(matches!(
            result,
            Err(PatientServiceError::Validation(VisitError::OutOfRange {
                field: VitalSign::HeartRate,
                ..
            }))
        ));
        assert!(service.store().is_empty());
    }

    #[test]
    fn test_add_visit_reports_persistence_failure() {
        let log = RecordingVisitLog::new().with_write_failure();
        let mut service = PatientRecordService::new(PatientStore::new(), log);

        let result = service.add_visit(patient(1), request(70));

        assert!(matches!(result, Err(PatientServiceError::Repository(_))));
        assert_eq!(service.store().visit_count(), 1);
    }

    #[test]
    fn test_delete_visits_rewrites_log() {
        let mut log = MockVisitLog::new();
        log.expect_rewrite()
            .withf(|store| store.visit_count() == 1)
            .times(1)
            .returning(|_| Ok(()));
        log.expect_location().return_const("memory".to_string());

        let mut store = PatientStore::new();
        let visit = validation::validate_request(&request(70)).unwrap();
        store.upsert_visit(patient(1), visit.clone());
        store.upsert_visit(patient(1), visit.clone());
        store.upsert_visit(patient(2), visit);

        let mut service = PatientRecordService::new(store, log);
        assert_eq!(service.delete_visits(patient(1)).unwrap(), 2);
        assert!(service.patient_visits(patient(1)).unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_patient_does_not_rewrite() {
        let mut log = MockVisitLog::new();
        log.expect_rewrite().never();

        let mut service = PatientRecordService::new(PatientStore::new(), log);
        assert!(matches!(
            service.delete_visits(patient(8)),
            Err(PatientServiceError::NotFound(id)) if id == patient(8)
        ));
    }

    #[test]
    fn test_load_reports_diagnostics() {
        let log = RecordingVisitLog::with_lines([
            "1,2023-01-01,36.6,72,16,120,80,98",
            "1,2023-01-01,36.6,72,16,120",
        ]);

        let (service, summary) = PatientRecordService::load(log).unwrap();

        assert_eq!(service.store().visit_count(), 1);
        assert_eq!(summary.diagnostics.len(), 1);
        assert_eq!(summary.diagnostics[0].line, 2);
        assert!(summary.source_unavailable.is_none());
    }

    #[test]
    fn test_load_propagates_read_failures() {
        let mut log = MockVisitLog::new();
        log.expect_read_lines().returning(|| {
            Err(RepositoryError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk error")))
        });

        let result = PatientRecordService::load(log);
        assert!(matches!(result, Err(PatientServiceError::Repository(_))));
    }

    #[test]
    fn test_statistics_for_raw_identifiers() {
        let service = loaded(&[
            "1,2023-01-01,36.6,60,16,120,80,98",
            "2,2023-01-01,36.6,80,16,120,80,98",
            "2,2023-01-02,36.6,100,16,120,80,98",
        ]);

        assert_eq!(service.statistics_for(0).unwrap().avg_heart_rate, 80.0);
        assert_eq!(service.statistics_for(2).unwrap().avg_heart_rate, 90.0);
        assert!(matches!(
            service.statistics_for(-2),
            Err(PatientServiceError::InvalidIdentifier(-2))
        ));
        assert!(matches!(service.statistics_for(5), Err(PatientServiceError::NotFound(_))));
    }

    #[test]
    fn test_follow_up_and_date_queries() {
        let service = loaded(&[
            "1,2023-01-01,36.6,72,16,120,80,98",
            "2,2023-02-01,36.6,72,16,120,80,85",
            "3,2023-02-11,36.6,55,16,120,80,98",
        ]);

        assert_eq!(
            service.patients_needing_follow_up(),
            vec![
                (patient(2), FollowUpReason::LowOxygenSaturation(85)),
                (patient(3), FollowUpReason::LowHeartRate(55)),
            ]
        );

        let february: Vec<u32> = service
            .visits_by_date(VisitDateFilter::new(Some(2023), Some(2)))
            .map(|(id, _)| id.get())
            .collect();
        assert_eq!(february, vec![2, 3]);
    }

    #[test]
    fn test_patients_lists_cleared_patient() {
        let mut service = loaded(&["4,2023-01-01,36.6,72,16,120,80,98"]);
        service.delete_visits(patient(4)).unwrap();

        let patients: Vec<(PatientId, usize)> =
            service.patients().map(|(id, visits)| (id, visits.len())).collect();
        assert_eq!(patients, vec![(patient(4), 0)]);
        assert_eq!(service.log().rewrites, vec![String::new()]);
    }

    #[test]
    fn test_mock_expectation_with_predicate() {
        let mut log = MockVisitLog::new();
        log.expect_append()
            .with(eq(patient(9)), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut service = PatientRecordService::new(PatientStore::new(), log);
        assert!(service.add_visit(patient(9), request(64)).is_ok());
    }
}
