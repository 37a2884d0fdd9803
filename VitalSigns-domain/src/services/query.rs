use std::fmt;

use chrono::Datelike;

use crate::entities::visit::{PatientId, Visit};
use vital_signs_data::repository::PatientStore;

/// Heart rate above which a patient needs follow-up
pub const HEART_RATE_HIGH: i32 = 100;
/// Heart rate below which a patient needs follow-up
pub const HEART_RATE_LOW: i32 = 60;
/// Systolic pressure above which a patient needs follow-up
pub const SYSTOLIC_HIGH: i32 = 140;
/// Oxygen saturation below which a patient needs follow-up
pub const OXYGEN_SATURATION_LOW: i32 = 90;

/// Year and/or month a visit must fall in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisitDateFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl VisitDateFilter {
    /// Create a filter; `None` matches any value
    pub fn new(year: Option<i32>, month: Option<u32>) -> Self {
        Self { year, month }
    }

    /// Filter from console input where 0 means "any"
    pub fn from_menu_input(year: i32, month: u32) -> Self {
        Self {
            year: (year != 0).then_some(year),
            month: (month != 0).then_some(month),
        }
    }

    /// Whether the visit falls in the requested year and month
    pub fn matches(&self, visit: &Visit) -> bool {
        self.year.map_or(true, |year| visit.date.year() == year)
            && self.month.map_or(true, |month| visit.date.month() == month)
    }
}

/// Visits across all patients matching the date filter
///
/// Order is patient order, then visit order within a patient.
pub fn find_visits_by_date(
    store: &PatientStore,
    filter: VisitDateFilter,
) -> impl Iterator<Item = (PatientId, &Visit)> + '_ {
    store
        .all_patients()
        .flat_map(|(patient_id, visits)| visits.iter().map(move |visit| (patient_id, visit)))
        .filter(move |(_, visit)| filter.matches(visit))
}

/// Criterion that flagged a visit for follow-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpReason {
    /// Heart rate above the upper threshold
    HighHeartRate(i32),
    /// Heart rate below the lower threshold
    LowHeartRate(i32),
    /// Systolic blood pressure above the threshold
    HighSystolic(i32),
    /// Oxygen saturation below the threshold
    LowOxygenSaturation(i32),
}

impl fmt::Display for FollowUpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowUpReason::HighHeartRate(value) => {
                write!(f, "heart rate {} bpm above {}", value, HEART_RATE_HIGH)
            }
            FollowUpReason::LowHeartRate(value) => {
                write!(f, "heart rate {} bpm below {}", value, HEART_RATE_LOW)
            }
            FollowUpReason::HighSystolic(value) => {
                write!(f, "systolic blood pressure {} mmHg above {}", value, SYSTOLIC_HIGH)
            }
            FollowUpReason::LowOxygenSaturation(value) => {
                write!(f, "oxygen saturation {}% below {}", value, OXYGEN_SATURATION_LOW)
            }
        }
    }
}

/// First follow-up criterion a visit meets, if any
///
/// Diastolic pressure and respiratory rate are not part of the rule.
pub fn follow_up_reason(visit: &Visit) -> Option<FollowUpReason> {
    if visit.heart_rate > HEART_RATE_HIGH {
        Some(FollowUpReason::HighHeartRate(visit.heart_rate))
    } else if visit.heart_rate < HEART_RATE_LOW {
        Some(FollowUpReason::LowHeartRate(visit.heart_rate))
    } else if visit.systolic_bp > SYSTOLIC_HIGH {
        Some(FollowUpReason::HighSystolic(visit.systolic_bp))
    } else if visit.oxygen_saturation < OXYGEN_SATURATION_LOW {
        Some(FollowUpReason::LowOxygenSaturation(visit.oxygen_saturation))
    } else {
        None
    }
}

/// Reason from the first qualifying visit of a patient
pub fn first_follow_up_reason(visits: &[Visit]) -> Option<FollowUpReason> {
    visits.iter().find_map(follow_up_reason)
}

/// Patients with at least one visit that needs follow-up, in store order
pub fn find_patients_needing_follow_up(
    store: &PatientStore,
) -> impl Iterator<Item = PatientId> + '_ {
    store
        .all_patients()
        .filter(|(_, visits)| first_follow_up_reason(visits).is_some())
        .map(|(patient_id, _)| patient_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ingestion::ingest_lines;

    fn patient(raw: u32) -> PatientId {
        PatientId::new(raw).unwrap()
    }

    fn ids(iter: impl Iterator<Item = PatientId>) -> Vec<u32> {
        iter.map(PatientId::get).collect()
    }

    fn dated_store() -> PatientStore {
        ingest_lines([
            "1,2023-01-15,36.6,72,16,120,80,98",
            "2,2022-01-03,36.6,72,16,120,80,98",
            "1,2022-05-20,36.6,72,16,120,80,98",
            "2,2023-05-09,36.6,72,16,120,80,98",
            "3,2023-01-28,36.6,72,16,120,80,98",
        ])
        .store
    }

    fn dates(store: &PatientStore, filter: VisitDateFilter) -> Vec<(u32, String)> {
        find_visits_by_date(store, filter)
            .map(|(id, visit)| (id.get(), visit.date_string()))
            .collect()
    }

    #[test]
    fn test_filter_by_year_and_month() {
        let store = dated_store();
        assert_eq!(
            dates(&store, VisitDateFilter::new(Some(2023), Some(1))),
            vec![(1, "2023-01-15".to_string()), (3, "2023-01-28".to_string())]
        );
    }

    #[test]
    fn test_filter_by_month_only_keeps_store_order() {
        let store = dated_store();
        assert_eq!(
            dates(&store, VisitDateFilter::new(None, Some(1))),
            vec![
                (1, "2023-01-15".to_string()),
                (2, "2022-01-03".to_string()),
                (3, "2023-01-28".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_by_year_only() {
        let store = dated_store();
        let matched = dates(&store, VisitDateFilter::new(Some(2022), None));
        assert_eq!(
            matched,
            vec![(1, "2022-05-20".to_string()), (2, "2022-01-03".to_string())]
        );
    }

    #[test]
    fn test_no_filter_returns_every_visit() {
        let store = dated_store();
        assert_eq!(find_visits_by_date(&store, VisitDateFilter::default()).count(), 5);
        assert_eq!(VisitDateFilter::from_menu_input(0, 0), VisitDateFilter::default());
        assert_eq!(
            VisitDateFilter::from_menu_input(2023, 0),
            VisitDateFilter::new(Some(2023), None)
        );
    }

    #[test]
    fn test_low_oxygen_alone_needs_follow_up() {
        let store = ingest_lines([
            "1,2023-01-01,36.6,72,16,120,80,98",
            "2,2023-01-01,36.6,72,16,120,80,85",
        ])
        .store;

        assert_eq!(ids(find_patients_needing_follow_up(&store)), vec![2]);
    }

    #[test]
    fn test_diastolic_and_respiratory_are_not_part_of_rule() {
        // Ranges are only enforced on creation, so the store can hold any value
        let mut store = PatientStore::new();
        let normal = ingest_lines(["1,2023-01-01,36.6,72,16,120,80,98"]).store;
        let visit = normal.get_visits(patient(1)).unwrap()[0].clone();

        store.upsert_visit(patient(1), Visit { diastolic_bp: 130, ..visit.clone() });
        store.upsert_visit(patient(2), Visit { respiratory_rate: 38, ..visit });

        assert!(ids(find_patients_needing_follow_up(&store)).is_empty());
    }

    #[test]
    fn test_thresholds_are_strict() {
        let store = ingest_lines([
            "1,2023-01-01,36.6,100,16,140,80,90",
            "2,2023-01-01,36.6,60,16,120,80,98",
            "3,2023-01-01,36.6,101,16,120,80,98",
            "4,2023-01-01,36.6,59,16,120,80,98",
            "5,2023-01-01,36.6,72,16,141,80,98",
        ])
        .store;

        assert_eq!(ids(find_patients_needing_follow_up(&store)), vec![3, 4, 5]);
    }

    #[test]
    fn test_any_visit_qualifies_patient() {
        let store = ingest_lines([
            "7,2023-01-01,36.6,72,16,120,80,98",
            "7,2023-02-01,36.6,72,16,150,80,98",
            "7,2023-03-01,36.6,72,16,120,80,98",
        ])
        .store;

        assert_eq!(ids(find_patients_needing_follow_up(&store)), vec![7]);
        assert_eq!(
            first_follow_up_reason(store.get_visits(patient(7)).unwrap()),
            Some(FollowUpReason::HighSystolic(150))
        );
    }

    #[test]
    fn test_reason_order() {
        let store = ingest_lines(["1,2023-01-01,36.6,120,16,150,80,80"]).store;
        let visit = &store.get_visits(patient(1)).unwrap()[0];
        assert_eq!(follow_up_reason(visit), Some(FollowUpReason::HighHeartRate(120)));
        assert_eq!(
            FollowUpReason::LowOxygenSaturation(85).to_string(),
            "oxygen saturation 85% below 90"
        );
    }
}
