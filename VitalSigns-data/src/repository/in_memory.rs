use indexmap::IndexMap;
use tracing::debug;

use crate::models::visit::{PatientId, Visit};
use super::errors::RepositoryError;

/// In-memory storage of visits grouped by patient
///
/// Patients are enumerated in the order they were first inserted and each
/// patient's visits keep their arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientStore {
    /// Visits of each patient
    patients: IndexMap<PatientId, Vec<Visit>>,
}

impl PatientStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            patients: IndexMap::new(),
        }
    }

    /// Append a visit to the patient's sequence, creating the patient if absent
    pub fn upsert_visit(&mut self, patient_id: PatientId, visit: Visit) {
        debug!("Storing visit for patient {} on {}", patient_id, visit.date_string());
        self.patients.entry(patient_id).or_default().push(visit);
    }

    /// Get the visits of one patient
    pub fn get_visits(&self, patient_id: PatientId) -> Result<&[Visit], RepositoryError> {
        self.patients
            .get(&patient_id)
            .map(Vec::as_slice)
            .ok_or(RepositoryError::NotFound(patient_id))
    }

    /// Iterate over every patient and its visits in insertion order
    pub fn all_patients(&self) -> impl Iterator<Item = (PatientId, &[Visit])> + '_ {
        self.patients
            .iter()
            .map(|(patient_id, visits)| (*patient_id, visits.as_slice()))
    }

    /// Remove every visit of a patient. The patient itself stays in the store.
    ///
    /// Returns the number of visits removed.
    pub fn clear_visits(&mut self, patient_id: PatientId) -> Result<usize, RepositoryError> {
        let visits = self
            .patients
            .get_mut(&patient_id)
            .ok_or(RepositoryError::NotFound(patient_id))?;

        let removed = visits.len();
        visits.clear();
        debug!("Cleared {} visits of patient {}", removed, patient_id);
        Ok(removed)
    }

    /// Whether the patient is known
    pub fn contains(&self, patient_id: PatientId) -> bool {
        self.patients.contains_key(&patient_id)
    }

    /// Number of known patients, including those without visits
    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    /// Total number of visits across all patients
    pub fn visit_count(&self) -> usize {
        self.patients.values().map(Vec::len).sum()
    }

    /// Whether no patient is known
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}
