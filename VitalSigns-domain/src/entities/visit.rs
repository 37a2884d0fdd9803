use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

pub use vital_signs_data::models::visit::{PatientId, Visit, DATE_FORMAT};

/// Vital signs that carry a physiological range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VitalSign {
    Temperature,
    HeartRate,
    RespiratoryRate,
    SystolicBp,
    DiastolicBp,
    OxygenSaturation,
}

impl VitalSign {
    /// Order in which range checks are applied
    pub const RANGE_CHECK_ORDER: [VitalSign; 6] = [
        VitalSign::Temperature,
        VitalSign::HeartRate,
        VitalSign::RespiratoryRate,
        VitalSign::SystolicBp,
        VitalSign::DiastolicBp,
        VitalSign::OxygenSaturation,
    ];

    /// Field name on [`CreateVisitRequest`]
    pub fn field_name(self) -> &'static str {
        match self {
            VitalSign::Temperature => "temperature",
            VitalSign::HeartRate => "heart_rate",
            VitalSign::RespiratoryRate => "respiratory_rate",
            VitalSign::SystolicBp => "systolic_bp",
            VitalSign::DiastolicBp => "diastolic_bp",
            VitalSign::OxygenSaturation => "oxygen_saturation",
        }
    }

    /// Inclusive bounds accepted for this vital sign
    pub fn bounds(self) -> (f64, f64) {
        match self {
            VitalSign::Temperature => (35.0, 42.0),
            VitalSign::HeartRate => (30.0, 180.0),
            VitalSign::RespiratoryRate => (5.0, 40.0),
            VitalSign::SystolicBp => (70.0, 200.0),
            VitalSign::DiastolicBp => (40.0, 120.0),
            VitalSign::OxygenSaturation => (70.0, 100.0),
        }
    }

    /// Unit the vital sign is measured in
    pub fn unit(self) -> &'static str {
        match self {
            VitalSign::Temperature => "C",
            VitalSign::HeartRate => "bpm",
            VitalSign::RespiratoryRate => "breaths per minute",
            VitalSign::SystolicBp | VitalSign::DiastolicBp => "mmHg",
            VitalSign::OxygenSaturation => "%",
        }
    }
}

impl fmt::Display for VitalSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VitalSign::Temperature => "temperature",
            VitalSign::HeartRate => "heart rate",
            VitalSign::RespiratoryRate => "respiratory rate",
            VitalSign::SystolicBp => "systolic blood pressure",
            VitalSign::DiastolicBp => "diastolic blood pressure",
            VitalSign::OxygenSaturation => "oxygen saturation",
        };
        f.write_str(label)
    }
}

/// Any field of a record line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordField {
    PatientId,
    Date,
    Vital(VitalSign),
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordField::PatientId => f.write_str("patient ID"),
            RecordField::Date => f.write_str("date"),
            RecordField::Vital(vital) => vital.fmt(f),
        }
    }
}

/// Reason a single visit record was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisitError {
    /// Wrong number of comma-separated fields
    #[error("Invalid number of fields ({0})")]
    MalformedLine(usize),

    /// A field could not be converted to its type
    #[error("Invalid data type for {field} ('{value}')")]
    MalformedValue { field: RecordField, value: String },

    /// A vital sign lies outside its physiological range
    #[error("Invalid {field} value ({value})")]
    OutOfRange { field: VitalSign, value: f64 },

    /// Patient identifiers must be positive
    #[error("Invalid patient identifier ({0})")]
    InvalidIdentifier(i64),
}

/// Request payload for recording a new visit
///
/// Integer vitals are wider than the stored `i32` so that any parsed integer
/// reaches the range check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateVisitRequest {
    /// Calendar date of the visit
    pub date: NaiveDate,

    /// Body temperature in degrees Celsius
    #[validate(range(
        min = 35.0,
        max = 42.0,
        message = "Temperature must be between 35.0 and 42.0 Celsius"
    ))]
    pub temperature: f64,

    /// Heart rate in beats per minute
    #[validate(range(min = 30, max = 180, message = "Heart rate must be between 30 and 180 bpm"))]
    pub heart_rate: i64,

    /// Respiratory rate in breaths per minute
    #[validate(range(
        min = 5,
        max = 40,
        message = "Respiratory rate must be between 5 and 40 breaths per minute"
    ))]
    pub respiratory_rate: i64,

    /// Systolic blood pressure in mmHg
    #[validate(range(min = 70, max = 200, message = "Systolic must be between 70 and 200 mmHg"))]
    pub systolic_bp: i64,

    /// Diastolic blood pressure in mmHg
    #[validate(range(min = 40, max = 120, message = "Diastolic must be between 40 and 120 mmHg"))]
    pub diastolic_bp: i64,

    /// Oxygen saturation in percent
    #[validate(range(
        min = 70,
        max = 100,
        message = "Oxygen saturation must be between 70 and 100%"
    ))]
    pub oxygen_saturation: i64,
}

impl CreateVisitRequest {
    /// Value of one vital sign on the request
    pub fn vital(&self, vital: VitalSign) -> f64 {
        match vital {
            VitalSign::Temperature => self.temperature,
            VitalSign::HeartRate => self.heart_rate as f64,
            VitalSign::RespiratoryRate => self.respiratory_rate as f64,
            VitalSign::SystolicBp => self.systolic_bp as f64,
            VitalSign::DiastolicBp => self.diastolic_bp as f64,
            VitalSign::OxygenSaturation => self.oxygen_saturation as f64,
        }
    }
}
