use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Textual form of a visit date in the data file
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifier of a patient. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(u32);

impl PatientId {
    /// Create an identifier, rejecting zero
    pub fn new(raw: u32) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    /// The raw numeric value
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for PatientId {
    type Error = i64;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        u32::try_from(raw)
            .ok()
            .and_then(PatientId::new)
            .ok_or(raw)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage model for one clinical observation of a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Calendar date of the visit
    pub date: NaiveDate,

    /// Body temperature in degrees Celsius
    pub temperature: f64,

    /// Heart rate in beats per minute
    pub heart_rate: i32,

    /// Respiratory rate in breaths per minute
    pub respiratory_rate: i32,

    /// Systolic blood pressure in mmHg
    pub systolic_bp: i32,

    /// Diastolic blood pressure in mmHg
    pub diastolic_bp: i32,

    /// Oxygen saturation in percent
    pub oxygen_saturation: i32,
}

impl Visit {
    /// Visit date rendered as `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
