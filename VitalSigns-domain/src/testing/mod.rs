// Testing utilities and fixtures for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test doubles from the data layer
pub use vital_signs_data::repository::tests::RecordingVisitLog;

use chrono::NaiveDate;

use crate::entities::visit::{CreateVisitRequest, PatientId, Visit};
use crate::services::patient_records::PatientRecordService;

/// Builder for visit requests with normal vital signs
#[derive(Debug, Clone)]
pub struct VisitBuilder {
    request: CreateVisitRequest,
}

impl Default for VisitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitBuilder {
    /// Start from a visit on 2023-01-01 with every vital in the normal range
    pub fn new() -> Self {
        Self {
            request: CreateVisitRequest {
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                temperature: 36.8,
                heart_rate: 72,
                respiratory_rate: 16,
                systolic_bp: 118,
                diastolic_bp: 78,
                oxygen_saturation: 98,
            },
        }
    }

    /// Set the visit date
    pub fn on(mut self, year: i32, month: u32, day: u32) -> Self {
        self.request.date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        self
    }

    pub fn temperature(mut self, value: f64) -> Self {
        self.request.temperature = value;
        self
    }

    pub fn heart_rate(mut self, value: i32) -> Self {
        self.request.heart_rate = i64::from(value);
        self
    }

    pub fn systolic_bp(mut self, value: i32) -> Self {
        self.request.systolic_bp = i64::from(value);
        self
    }

    pub fn oxygen_saturation(mut self, value: i32) -> Self {
        self.request.oxygen_saturation = i64::from(value);
        self
    }

    /// The request as built
    pub fn request(self) -> CreateVisitRequest {
        self.request
    }

    /// The stored visit, without validation
    pub fn visit(self) -> Visit {
        crate::entities::conversions::convert_to_data_visit(&self.request)
    }
}

/// Shorthand for a known-valid patient identifier
pub fn patient(raw: u32) -> PatientId {
    PatientId::new(raw).expect("patient identifiers in tests are positive")
}

/// Service over a recording log preloaded with record lines
pub fn service_with_lines(lines: &[&str]) -> PatientRecordService<RecordingVisitLog> {
    let log = RecordingVisitLog::with_lines(lines.iter().copied());
    let (service, _) = PatientRecordService::load(log).expect("recording log never fails to read");
    service
}
