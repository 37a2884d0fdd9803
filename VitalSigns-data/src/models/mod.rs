pub mod visit;

pub use visit::{PatientId, Visit, DATE_FORMAT};
