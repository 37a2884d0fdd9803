use serde::Serialize;

use crate::entities::conversions;
use crate::entities::visit::{PatientId, Visit};
use crate::services::patient_records::PatientServiceError;
use vital_signs_data::repository::PatientStore;

/// Which visits an aggregation covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsScope {
    /// Every visit of every patient
    AllPatients,
    /// Every visit of one patient
    Patient(PatientId),
}

impl StatsScope {
    /// Interpret a raw identifier where 0 is reserved for "all patients"
    pub fn from_raw(raw: i64) -> Result<Self, PatientServiceError> {
        if raw == 0 {
            return Ok(StatsScope::AllPatients);
        }
        conversions::patient_id_from_raw(raw)
            .map(StatsScope::Patient)
            .map_err(|_| PatientServiceError::InvalidIdentifier(raw))
    }
}

/// Mean vital signs over a set of visits, rounded to two decimals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalStatistics {
    /// Number of visits the means were computed from
    pub visit_count: usize,
    pub avg_temperature: f64,
    pub avg_heart_rate: f64,
    pub avg_respiratory_rate: f64,
    pub avg_systolic_bp: f64,
    pub avg_diastolic_bp: f64,
    pub avg_oxygen_saturation: f64,
}

#[derive(Debug, Default)]
struct VitalSums {
    count: usize,
    temperature: f64,
    heart_rate: f64,
    respiratory_rate: f64,
    systolic_bp: f64,
    diastolic_bp: f64,
    oxygen_saturation: f64,
}

impl VitalSums {
    fn add(&mut self, visit: &Visit) {
        self.count += 1;
        self.temperature += visit.temperature;
        self.heart_rate += f64::from(visit.heart_rate);
        self.respiratory_rate += f64::from(visit.respiratory_rate);
        self.systolic_bp += f64::from(visit.systolic_bp);
        self.diastolic_bp += f64::from(visit.diastolic_bp);
        self.oxygen_saturation += f64::from(visit.oxygen_saturation);
    }

    fn into_statistics(self) -> Option<VitalStatistics> {
        if self.count == 0 {
            return None;
        }
        let count = self.count as f64;
        let mean = |sum: f64| round_two_decimals(sum / count);

        Some(VitalStatistics {
            visit_count: self.count,
            avg_temperature: mean(self.temperature),
            avg_heart_rate: mean(self.heart_rate),
            avg_respiratory_rate: mean(self.respiratory_rate),
            avg_systolic_bp: mean(self.systolic_bp),
            avg_diastolic_bp: mean(self.diastolic_bp),
            avg_oxygen_saturation: mean(self.oxygen_saturation),
        })
    }
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the mean of each vital sign over the visits in scope
///
/// The all-patients means divide by the total number of visits, not by the
/// number of patients.
pub fn compute_stats(
    store: &PatientStore,
    scope: StatsScope,
) -> Result<VitalStatistics, PatientServiceError> {
    let mut sums = VitalSums::default();

    match scope {
        StatsScope::AllPatients => {
            if store.is_empty() {
                return Err(PatientServiceError::NoData(
                    "No data found for any patients".to_string(),
                ));
            }
            for (_, visits) in store.all_patients() {
                visits.iter().for_each(|visit| sums.add(visit));
            }
            sums.into_statistics().ok_or_else(|| {
                PatientServiceError::NoData("No visits recorded for any patient".to_string())
            })
        }
        StatsScope::Patient(patient_id) => {
            let visits = store
                .get_visits(patient_id)
                .map_err(|_| PatientServiceError::NotFound(patient_id))?;
            visits.iter().for_each(|visit| sums.add(visit));
            sums.into_statistics().ok_or_else(|| {
                let message = format!("No visits recorded for patient {}", patient_id);
                PatientServiceError::NoData(message)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ingestion::ingest_lines;

    fn patient(raw: u32) -> PatientId {
        PatientId::new(raw).unwrap()
    }

    fn sample_store() -> PatientStore {
        ingest_lines([
            "1,2023-01-01,36.5,60,12,110,70,97",
            "1,2023-01-02,37.0,80,16,120,80,98",
            "2,2023-01-03,37.2,100,20,130,90,96",
        ])
        .store
    }

    #[test]
    fn test_scope_from_raw() {
        assert_eq!(StatsScope::from_raw(0).unwrap(), StatsScope::AllPatients);
        assert_eq!(StatsScope::from_raw(4).unwrap(), StatsScope::Patient(patient(4)));
        assert!(matches!(
            StatsScope::from_raw(-1),
            Err(PatientServiceError::InvalidIdentifier(-1))
        ));
    }

    #[test]
    fn test_empty_store_has_no_data() {
        let result = compute_stats(&PatientStore::new(), StatsScope::AllPatients);
        assert!(matches!(result, Err(PatientServiceError::NoData(_))));
    }

    #[test]
    fn test_all_patients_divides_by_visit_count() {
        let stats = compute_stats(&sample_store(), StatsScope::AllPatients).unwrap();
        assert_eq!(stats.visit_count, 3);
        assert_eq!(stats.avg_heart_rate, 80.0);
        assert_eq!(stats.avg_temperature, 36.9);
        assert_eq!(stats.avg_respiratory_rate, 16.0);
        assert_eq!(stats.avg_systolic_bp, 120.0);
        assert_eq!(stats.avg_diastolic_bp, 80.0);
        assert_eq!(stats.avg_oxygen_saturation, 97.0);
    }

    #[test]
    fn test_means_are_rounded_to_two_decimals() {
        let store = ingest_lines([
            "1,2023-01-01,36.6,70,16,120,80,97",
            "1,2023-01-02,36.6,71,16,120,80,98",
            "1,2023-01-03,36.7,71,16,120,80,98",
        ])
        .store;

        let stats = compute_stats(&store, StatsScope::Patient(patient(1))).unwrap();
        assert_eq!(stats.avg_heart_rate, 70.67);
        assert_eq!(stats.avg_oxygen_saturation, 97.67);
        assert_eq!(stats.avg_temperature, 36.63);
    }

    #[test]
    fn test_single_patient_scope() {
        let stats = compute_stats(&sample_store(), StatsScope::Patient(patient(2))).unwrap();
        assert_eq!(stats.visit_count, 1);
        assert_eq!(stats.avg_heart_rate, 100.0);
    }

    #[test]
    fn test_unknown_patient_is_not_found() {
        let result = compute_stats(&sample_store(), StatsScope::Patient(patient(9)));
        assert!(matches!(result, Err(PatientServiceError::NotFound(id)) if id == patient(9)));
    }

    #[test]
    fn test_patient_without_visits_has_no_data() {
        let mut store = sample_store();
        store.clear_visits(patient(2)).unwrap();

        let result = compute_stats(&store, StatsScope::Patient(patient(2)));
        assert!(matches!(result, Err(PatientServiceError::NoData(_))));
    }

    #[test]
    fn test_all_cleared_has_no_data() {
        let mut store = sample_store();
        store.clear_visits(patient(1)).unwrap();
        store.clear_visits(patient(2)).unwrap();

        let result = compute_stats(&store, StatsScope::AllPatients);
        assert!(matches!(result, Err(PatientServiceError::NoData(_))));
    }
}
