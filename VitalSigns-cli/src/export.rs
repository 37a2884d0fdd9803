use indexmap::IndexMap;
use vital_signs_data::repository::VisitLogTrait;
use vital_signs_domain::entities::{PatientId, Visit};
use vital_signs_domain::services::PatientRecordService;

/// Every patient and their visits as a JSON object keyed by patient ID, in store order
pub fn patients_as_json<L: VisitLogTrait>(
    service: &PatientRecordService<L>,
    pretty: bool,
) -> serde_json::Result<String> {
    let patients: IndexMap<PatientId, &[Visit]> = service.patients().collect();
    if pretty {
        serde_json::to_string_pretty(&patients)
    } else {
        serde_json::to_string(&patients)
    }
}
