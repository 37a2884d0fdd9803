//! Line-oriented persisted format for visits
//!
//! Every visit is one line of eight comma-separated fields:
//! `patientId,date,temperature,heartRate,respiratoryRate,systolicBP,diastolicBP,oxygenSaturation`.
//! The legacy dump written by older versions on bulk delete is available through
//! [`RewriteFormat::Legacy`]; it cannot be read back.

use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::models::visit::{PatientId, Visit};
use crate::repository::PatientStore;

/// Separator between fields of a record line
pub const FIELD_SEPARATOR: char = ',';

/// Number of fields in a record line (identifier plus seven visit fields)
pub const RECORD_FIELD_COUNT: usize = 8;

/// Format used when the whole data file is rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewriteFormat {
    /// One record line per visit, identical to the append format
    #[default]
    Lines,

    /// `patientId : [[visit, ...], ...]` per patient
    Legacy,
}

impl FromStr for RewriteFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lines" | "csv" => Ok(RewriteFormat::Lines),
            "legacy" => Ok(RewriteFormat::Legacy),
            _ => Err(ConfigError::UnsupportedRewriteFormat(s.to_string())),
        }
    }
}

impl fmt::Display for RewriteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteFormat::Lines => write!(f, "lines"),
            RewriteFormat::Legacy => write!(f, "legacy"),
        }
    }
}

/// Split a raw line into its fields. Surrounding whitespace of the line is ignored.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.trim().split(FIELD_SEPARATOR).collect()
}

/// Render one visit as a record line, without terminator
pub fn format_visit_line(patient_id: PatientId, visit: &Visit) -> String {
    format!(
        "{},{},{},{},{},{},{},{}",
        patient_id,
        visit.date_string(),
        visit.temperature,
        visit.heart_rate,
        visit.respiratory_rate,
        visit.systolic_bp,
        visit.diastolic_bp,
        visit.oxygen_saturation,
    )
}

/// Render one patient in the legacy dump format, without terminator
pub fn format_legacy_patient(patient_id: PatientId, visits: &[Visit]) -> String {
    let visits = visits
        .iter()
        .map(|visit| {
            // Debug keeps the decimal point on whole temperatures (37.0)
            format!(
                "['{}', {:?}, {}, {}, {}, {}, {}]",
                visit.date_string(),
                visit.temperature,
                visit.heart_rate,
                visit.respiratory_rate,
                visit.systolic_bp,
                visit.diastolic_bp,
                visit.oxygen_saturation,
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("{} : [{}]", patient_id, visits)
}

/// Render the full contents of a data file for the given store
pub fn render_store(store: &PatientStore, format: RewriteFormat) -> String {
    let mut contents = String::new();

    for (patient_id, visits) in store.all_patients() {
        match format {
            RewriteFormat::Lines => {
                for visit in visits {
                    contents.push_str(&format_visit_line(patient_id, visit));
                    contents.push('\n');
                }
            }
            RewriteFormat::Legacy => {
                contents.push_str(&format_legacy_patient(patient_id, visits));
                contents.push('\n');
            }
        }
    }

    contents
}
