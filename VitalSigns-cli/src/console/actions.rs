//! Menu actions
//!
//! Each action runs one service operation and writes its outcome for the user.
//! Failures are reported on the console and never end the session; only I/O
//! errors on the output itself propagate.

use std::io::{self, Write};

use tracing::debug;
use vital_signs_data::repository::VisitLogTrait;
use vital_signs_domain::entities::conversions::{parse_visit_date, patient_id_from_raw};
use vital_signs_domain::entities::CreateVisitRequest;
use vital_signs_domain::services::{
    PatientRecordService, PatientServiceError, StatsScope, VisitDateFilter,
};

use super::render;

/// Raw values collected for a new visit
#[derive(Debug, Clone, PartialEq)]
pub struct VisitInput {
    pub patient_id: i64,
    pub date: String,
    pub temperature: f64,
    pub heart_rate: i64,
    pub respiratory_rate: i64,
    pub systolic_bp: i64,
    pub diastolic_bp: i64,
    pub oxygen_saturation: i64,
}

/// Print every patient with all of their visits
pub fn display_patients<L: VisitLogTrait, W: Write>(
    service: &PatientRecordService<L>,
    out: &mut W,
) -> io::Result<()> {
    for (patient_id, visits) in service.patients() {
        render::write_patient(out, patient_id, visits)?;
    }
    Ok(())
}

/// Print the visits of one patient
pub fn display_patient<L: VisitLogTrait, W: Write>(
    service: &PatientRecordService<L>,
    raw_patient_id: i64,
    out: &mut W,
) -> io::Result<()> {
    let visits = patient_id_from_raw(raw_patient_id)
        .ok()
        .and_then(|patient_id| {
            service.patient_visits(patient_id).ok().map(|visits| (patient_id, visits))
        });

    match visits {
        Some((patient_id, visits)) => render::write_patient(out, patient_id, visits),
        None => writeln!(out, "Patient ID {} not found.", raw_patient_id),
    }
}

/// Validate, store and persist a new visit
pub fn add_visit<L: VisitLogTrait, W: Write>(
    service: &mut PatientRecordService<L>,
    input: VisitInput,
    out: &mut W,
) -> io::Result<()> {
    let Ok(patient_id) = patient_id_from_raw(input.patient_id) else {
        return writeln!(out, "Error: patient ID should be a positive integer.");
    };
    let Ok(date) = parse_visit_date(&input.date) else {
        return writeln!(out, "Invalid date format. Please enter date in the format 'yyyy-mm-dd'.");
    };

    let request = CreateVisitRequest {
        date,
        temperature: input.temperature,
        heart_rate: input.heart_rate,
        respiratory_rate: input.respiratory_rate,
        systolic_bp: input.systolic_bp,
        diastolic_bp: input.diastolic_bp,
        oxygen_saturation: input.oxygen_saturation,
    };

    match service.add_visit(patient_id, request) {
        Ok(_) => writeln!(out, "Visit is saved successfully for Patient #{}", patient_id),
        Err(e) => {
            debug!("Visit for patient {} rejected: {}", patient_id, e);
            render::write_error(out, &e)
        }
    }
}

/// Print mean vital signs; 0 selects every patient
pub fn show_statistics<L: VisitLogTrait, W: Write>(
    service: &PatientRecordService<L>,
    raw_patient_id: i64,
    out: &mut W,
) -> io::Result<()> {
    let result = StatsScope::from_raw(raw_patient_id)
        .and_then(|scope| service.statistics(scope).map(|stats| (scope, stats)));

    match result {
        Ok((scope, stats)) => render::write_statistics(out, scope, &stats),
        Err(e) => render::write_error(out, &e),
    }
}

/// Print visits in the requested year and month
pub fn show_visits_by_date<L: VisitLogTrait, W: Write>(
    service: &PatientRecordService<L>,
    filter: VisitDateFilter,
    out: &mut W,
) -> io::Result<()> {
    let mut found = false;
    for (patient_id, visit) in service.visits_by_date(filter) {
        render::write_date_match(out, patient_id, visit)?;
        found = true;
    }
    if !found {
        writeln!(out, "No visits found for the specified year/month.")?;
    }
    Ok(())
}

/// Print patients that need a follow-up visit
pub fn show_follow_up<L: VisitLogTrait, W: Write>(
    service: &PatientRecordService<L>,
    out: &mut W,
) -> io::Result<()> {
    render::write_follow_up(out, &service.patients_needing_follow_up())
}

/// Delete every visit of a patient and rewrite the data file
pub fn delete_visits<L: VisitLogTrait, W: Write>(
    service: &mut PatientRecordService<L>,
    raw_patient_id: i64,
    out: &mut W,
) -> io::Result<()> {
    let Ok(patient_id) = patient_id_from_raw(raw_patient_id) else {
        return writeln!(out, "Patient {} not found in the data.", raw_patient_id);
    };

    match service.delete_visits(patient_id) {
        Ok(_) => writeln!(
            out,
            "All visits of patient {} deleted and data saved to {}",
            patient_id,
            service.log().location()
        ),
        Err(PatientServiceError::NotFound(_)) => {
            writeln!(out, "Patient {} not found in the data.", patient_id)
        }
        Err(e) => render::write_error(out, &e),
    }
}
