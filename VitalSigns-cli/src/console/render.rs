//! Console rendering of patients, visits, statistics and errors

use std::io::{self, Write};

use vital_signs_domain::entities::{PatientId, Visit, VisitError, VitalSign};
use vital_signs_domain::services::{
    FollowUpReason, LoadSummary, PatientServiceError, StatsScope, VitalStatistics,
};

const SEPARATOR_WIDTH: usize = 30;

/// Report skipped lines and a missing data file after startup
pub fn write_load_summary<W: Write>(out: &mut W, summary: &LoadSummary) -> io::Result<()> {
    for diagnostic in &summary.diagnostics {
        writeln!(out, "{}", diagnostic)?;
    }
    if let Some(location) = &summary.source_unavailable {
        writeln!(out, "The file '{}' could not be found.", location)?;
    }
    Ok(())
}

/// All visits of one patient
pub fn write_patient<W: Write>(
    out: &mut W,
    patient_id: PatientId,
    visits: &[Visit],
) -> io::Result<()> {
    writeln!(out, "Patient ID: {}", patient_id)?;
    for visit in visits {
        writeln!(out, "Date: {}", visit.date_string())?;
        writeln!(out, "Temperature: {}", visit.temperature)?;
        writeln!(out, "Heart Rate: {}", visit.heart_rate)?;
        writeln!(out, "Respiratory Rate: {}", visit.respiratory_rate)?;
        writeln!(out, "Systolic Blood Pressure: {}", visit.systolic_bp)?;
        writeln!(out, "Diastolic Blood Pressure: {}", visit.diastolic_bp)?;
        writeln!(out, "Oxygen Saturation: {}", visit.oxygen_saturation)?;
        writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    }
    Ok(())
}

/// One visit found by a date search
pub fn write_date_match<W: Write>(
    out: &mut W,
    patient_id: PatientId,
    visit: &Visit,
) -> io::Result<()> {
    writeln!(out, "Patient ID: {}", patient_id)?;
    writeln!(out, " Visit Date: {}", visit.date_string())?;
    writeln!(out, "  Temperature: {:.2} C", visit.temperature)?;
    writeln!(out, "  Heart Rate: {} bpm", visit.heart_rate)?;
    writeln!(out, "  Respiratory Rate: {} bpm", visit.respiratory_rate)?;
    writeln!(out, "  Systolic Blood Pressure: {} mmHg", visit.systolic_bp)?;
    writeln!(out, "  Diastolic Blood Pressure: {} mmHg", visit.diastolic_bp)?;
    writeln!(out, "  Oxygen Saturation: {} %", visit.oxygen_saturation)
}

/// Mean vital signs for a scope
pub fn write_statistics<W: Write>(
    out: &mut W,
    scope: StatsScope,
    stats: &VitalStatistics,
) -> io::Result<()> {
    match scope {
        StatsScope::AllPatients => writeln!(out, "Vital Signs for All Patients:")?,
        StatsScope::Patient(patient_id) => {
            writeln!(out, "Vital Signs for Patient {}:", patient_id)?
        }
    }
    writeln!(out, "  Average temperature: {:.2} C", stats.avg_temperature)?;
    writeln!(out, "  Average heart rate: {:.2} bpm", stats.avg_heart_rate)?;
    writeln!(out, "  Average respiratory rate: {:.2} bpm", stats.avg_respiratory_rate)?;
    writeln!(out, "  Average systolic blood pressure: {:.2} mmHg", stats.avg_systolic_bp)?;
    writeln!(out, "  Average diastolic blood pressure: {:.2} mmHg", stats.avg_diastolic_bp)?;
    writeln!(out, "  Average oxygen saturation: {:.2} %", stats.avg_oxygen_saturation)?;
    writeln!(out, "  Visits analyzed: {}", stats.visit_count)
}

/// Patients flagged for follow-up
pub fn write_follow_up<W: Write>(
    out: &mut W,
    flagged: &[(PatientId, FollowUpReason)],
) -> io::Result<()> {
    if flagged.is_empty() {
        return writeln!(out, "No patients found who need follow-up visits.");
    }
    writeln!(out, "Patients who need follow-up visits:")?;
    for (patient_id, reason) in flagged {
        writeln!(out, "{} ({})", patient_id, reason)?;
    }
    Ok(())
}

/// User-facing message for a failed operation
pub fn describe_error(error: &PatientServiceError) -> String {
    match error {
        PatientServiceError::Validation(VisitError::OutOfRange { field, .. }) => range_hint(*field),
        PatientServiceError::Validation(VisitError::InvalidIdentifier(_))
        | PatientServiceError::InvalidIdentifier(_) => {
            "Error: patient ID should be a positive integer.".to_string()
        }
        PatientServiceError::Validation(e) => format!("Invalid input: {}.", e),
        PatientServiceError::NotFound(patient_id) => {
            format!("Patient ID {} not found.", patient_id)
        }
        PatientServiceError::NoData(message) => format!("{}.", message),
        PatientServiceError::SourceUnavailable(_) | PatientServiceError::Repository(_) => {
            format!("Error: {}", error)
        }
    }
}

/// Write the message for a failed operation
pub fn write_error<W: Write>(out: &mut W, error: &PatientServiceError) -> io::Result<()> {
    writeln!(out, "{}", describe_error(error))
}

fn range_hint(vital: VitalSign) -> String {
    let (min, max) = vital.bounds();
    let precision = if vital == VitalSign::Temperature { 1 } else { 0 };
    let label = vital.to_string();
    let article = if label.starts_with(['a', 'e', 'i', 'o', 'u']) { "an" } else { "a" };
    format!(
        "Invalid {vital}. Please enter {article} {vital} between \
         {min:.precision$} and {max:.precision$} {unit}.",
        vital = label,
        article = article,
        min = min,
        max = max,
        precision = precision,
        unit = vital.unit(),
    )
}
