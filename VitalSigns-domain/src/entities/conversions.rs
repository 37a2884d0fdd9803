use std::str::FromStr;

use chrono::NaiveDate;

use crate::entities::visit::{
    CreateVisitRequest, PatientId, RecordField, Visit, VisitError, VitalSign, DATE_FORMAT,
};

/// Conversion functions between raw text, domain requests and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Parse a patient identifier, rejecting non-positive values
pub fn parse_patient_id(raw: &str) -> Result<PatientId, VisitError> {
    let value: i64 = parse_field(RecordField::PatientId, raw)?;
    patient_id_from_raw(value)
}

/// Convert an already numeric identifier, rejecting non-positive values
pub fn patient_id_from_raw(raw: i64) -> Result<PatientId, VisitError> {
    PatientId::try_from(raw).map_err(VisitError::InvalidIdentifier)
}

/// Parse a `YYYY-MM-DD` date that must exist on the calendar
pub fn parse_visit_date(raw: &str) -> Result<NaiveDate, VisitError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| VisitError::MalformedValue {
        field: RecordField::Date,
        value: raw.to_string(),
    })
}

/// Convert the seven raw visit fields of a record line into a typed request
///
/// Only type conversion happens here; ranges are checked by the validator.
pub fn convert_to_domain_request(fields: &[&str]) -> Result<CreateVisitRequest, VisitError> {
    let [
        date,
        temperature,
        heart_rate,
        respiratory_rate,
        systolic_bp,
        diastolic_bp,
        oxygen_saturation,
    ] = fields
    else {
        // Identifier plus the visit fields
        return Err(VisitError::MalformedLine(fields.len() + 1));
    };

    let date = parse_visit_date(date)?;
    let temperature: f64 = parse_field(RecordField::Vital(VitalSign::Temperature), temperature)?;
    if !temperature.is_finite() {
        return Err(VisitError::MalformedValue {
            field: RecordField::Vital(VitalSign::Temperature),
            value: temperature.to_string(),
        });
    }

    Ok(CreateVisitRequest {
        date,
        temperature,
        heart_rate: parse_field(RecordField::Vital(VitalSign::HeartRate), heart_rate)?,
        respiratory_rate: parse_field(
            RecordField::Vital(VitalSign::RespiratoryRate),
            respiratory_rate,
        )?,
        systolic_bp: parse_field(RecordField::Vital(VitalSign::SystolicBp), systolic_bp)?,
        diastolic_bp: parse_field(RecordField::Vital(VitalSign::DiastolicBp), diastolic_bp)?,
        oxygen_saturation: parse_field(
            RecordField::Vital(VitalSign::OxygenSaturation),
            oxygen_saturation,
        )?,
    })
}

/// Convert a validated request into the storage model
///
/// Integer vitals outside `i32` saturate; validated requests never hit that.
pub fn convert_to_data_visit(request: &CreateVisitRequest) -> Visit {
    Visit {
        date: request.date,
        temperature: request.temperature,
        heart_rate: saturate(request.heart_rate),
        respiratory_rate: saturate(request.respiratory_rate),
        systolic_bp: saturate(request.systolic_bp),
        diastolic_bp: saturate(request.diastolic_bp),
        oxygen_saturation: saturate(request.oxygen_saturation),
    }
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn parse_field<T: FromStr>(field: RecordField, raw: &str) -> Result<T, VisitError> {
    raw.trim().parse::<T>().map_err(|_| VisitError::MalformedValue {
        field,
        value: raw.to_string(),
    })
}
