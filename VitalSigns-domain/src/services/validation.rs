use validator::Validate;

use crate::entities::conversions;
use crate::entities::visit::{CreateVisitRequest, Visit, VisitError, VitalSign};

/// Validate a typed request against the physiological ranges
///
/// Only the first violation in [`VitalSign::RANGE_CHECK_ORDER`] is reported.
pub fn validate_request(request: &CreateVisitRequest) -> Result<Visit, VisitError> {
    if let Err(validation_errors) = request.validate() {
        let field_errors = validation_errors.field_errors();
        let first_violation = VitalSign::RANGE_CHECK_ORDER
            .into_iter()
            .find(|vital| field_errors.contains_key(vital.field_name()));

        if let Some(vital) = first_violation {
            return Err(VisitError::OutOfRange {
                field: vital,
                value: request.vital(vital),
            });
        }
    }

    Ok(conversions::convert_to_data_visit(request))
}

/// Validate the seven raw visit fields of a record line
///
/// Every field is converted to its type before any range is checked.
pub fn validate_fields(fields: &[&str]) -> Result<Visit, VisitError> {
    let request = conversions::convert_to_domain_request(fields)?;
    validate_request(&request)
}
