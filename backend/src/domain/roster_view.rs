//! Read-only projections over the roster for presentation layers.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::commands::roster::{
    AlertThresholds, DashboardAlert, DashboardSummary, Occupancy, StudentFilter,
};
use crate::domain::errors::DomainResult;
use crate::domain::ledger_service::total_outstanding_debt;
use crate::domain::models::{group::Group, student::Student, transaction::TransactionKind};
use crate::domain::today_or;
use crate::storage::{RecordStore, StoreHandle};

#[derive(Clone)]
pub struct RosterView {
    store: StoreHandle,
    thresholds: AlertThresholds,
}

impl RosterView {
    pub fn new(store: StoreHandle, thresholds: AlertThresholds) -> Self {
        Self { store, thresholds }
    }

    /// Students matching every provided criterion, in roster order
    pub fn search_students(&self, filter: &StudentFilter) -> Vec<Student> {
        debug!("Searching students: {:?}", filter);
        let needle = filter.search.as_deref().map(str::trim).unwrap_or("");

        self.store.read(|store| {
            store
                .students()
                .iter()
                .filter(|s| needle.is_empty() || s.name.contains(needle) || s.phone.contains(needle))
                .filter(|s| filter.status.map_or(true, |status| s.status == status))
                .filter(|s| filter.group_id.as_deref().map_or(true, |id| s.is_enrolled_in(id)))
                .cloned()
                .collect()
        })
    }

    pub fn student(&self, student_id: &str) -> DomainResult<Student> {
        self.store.read(|store| store.require_student(student_id).cloned())
    }

    pub fn groups(&self) -> Vec<Group> {
        self.store.read(|store| store.groups().to_vec())
    }

    /// Real enrollment of a group compared to its capacity
    pub fn occupancy(&self, group_id: &str) -> DomainResult<Occupancy> {
        self.store.read(|store| {
            let group = store.require_group(group_id)?;
            Ok(Self::occupancy_of(store, group))
        })
    }

    pub fn all_occupancy(&self) -> Vec<Occupancy> {
        self.store.read(|store| {
            store
                .groups()
                .iter()
                .map(|group| Self::occupancy_of(store, group))
                .collect()
        })
    }

    fn occupancy_of(store: &RecordStore, group: &Group) -> Occupancy {
        let enrolled = store
            .students()
            .iter()
            .filter(|s| s.is_enrolled_in(&group.id))
            .count();
        Occupancy {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            enrolled,
            capacity: group.capacity,
            is_full: enrolled >= group.capacity as usize,
        }
    }

    /// Groups whose schedule has a slot on the given day label (e.g. "Sunday")
    pub fn groups_meeting_on(&self, day_label: &str) -> Vec<Group> {
        self.store.read(|store| {
            store
                .groups()
                .iter()
                .filter(|g| g.meets_on(day_label))
                .cloned()
                .collect()
        })
    }

    /// Headline numbers and urgent alerts for the landing screen
    pub fn dashboard(&self, day: Option<NaiveDate>) -> DashboardSummary {
        let day = today_or(day);
        let day_label = day.format("%A").to_string();

        self.store.read(|store| {
            let rates: Vec<u64> = store
                .students()
                .iter()
                .filter_map(|s| s.attendance_rate.map(u64::from))
                .collect();
            // None when no student has a rate yet
            let average = (!rates.is_empty()).then(|| {
                let count = rates.len() as u64;
                ((2 * rates.iter().sum::<u64>() + count) / (2 * count)) as u8
            });

            let income_on_day = store
                .transactions()
                .iter()
                .filter(|t| t.kind == TransactionKind::Payment && t.date == day)
                .fold(0u64, |total, t| total.saturating_add(t.amount));

            let sessions_today: Vec<String> = store
                .groups()
                .iter()
                .filter(|g| g.meets_on(&day_label))
                .map(|g| g.name.clone())
                .collect();

            let high_debt_students = store
                .students()
                .iter()
                .filter(|s| s.balance > self.thresholds.high_debt)
                .count();

            let mut alerts = Vec::new();
            if high_debt_students > 0 {
                alerts.push(DashboardAlert::HighDebt {
                    students: high_debt_students,
                });
            }
            if let Some(average) = average.filter(|a| *a < self.thresholds.low_attendance) {
                alerts.push(DashboardAlert::LowAttendance {
                    average,
                    threshold: self.thresholds.low_attendance,
                });
            }
            alerts.push(DashboardAlert::SessionsToday {
                count: sessions_today.len(),
            });

            DashboardSummary {
                date: day,
                student_count: store.students().len(),
                group_count: store.groups().len(),
                average_attendance_rate: average.unwrap_or(0),
                outstanding_debt: total_outstanding_debt(store),
                income_on_day,
                sessions_today,
                alerts,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::models::student::StudentStatus;
    use crate::domain::models::transaction::Transaction;
    use crate::storage::seed::seed_store;
    use crate::storage::Collection;

    fn setup_test() -> (RosterView, StoreHandle) {
        let store = StoreHandle::in_memory(seed_store());
        (RosterView::new(store.clone(), AlertThresholds::default()), store)
    }

    #[test]
    fn test_search_by_name_or_phone() {
        let (view, _store) = setup_test();

        let by_name = view.search_students(&StudentFilter {
            search: Some("Sara".to_string()),
            ..Default::default()
        });
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "s2");

        let by_phone = view.search_students(&StudentFilter {
            search: Some("567890".to_string()),
            ..Default::default()
        });
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].id, "s3");

        assert_eq!(view.search_students(&StudentFilter::default()).len(), 3);
    }

    #[test]
    fn test_filter_by_status_and_group() {
        let (view, _store) = setup_test();

        let debtors = view.search_students(&StudentFilter {
            status: Some(StudentStatus::Debtor),
            ..Default::default()
        });
        assert_eq!(debtors.len(), 1);

        let in_g1 = view.search_students(&StudentFilter {
            group_id: Some("g1".to_string()),
            ..Default::default()
        });
        assert_eq!(in_g1.len(), 2);

        let active_in_g2 = view.search_students(&StudentFilter {
            status: Some(StudentStatus::Active),
            group_id: Some("g2".to_string()),
            ..Default::default()
        });
        assert!(active_in_g2.is_empty());
    }

    #[test]
    fn test_occupancy_counts_enrollments_not_current_count() {
        let (view, _store) = setup_test();

        let g1 = view.occupancy("g1").unwrap();
        assert_eq!(g1.enrolled, 2);
        assert_eq!(g1.capacity, 50);
        assert!(!g1.is_full);

        assert_eq!(view.all_occupancy().len(), 2);
        assert_eq!(view.occupancy("g9").unwrap_err(), DomainError::UnknownGroup("g9".to_string()));
    }

    #[test]
    fn test_full_group() {
        let (view, store) = setup_test();
        store
            .write(&[Collection::Groups], |s| {
                if let Some(group) = s.group_mut("g2") {
                    group.capacity = 1;
                }
                Ok::<_, DomainError>(())
            })
            .unwrap();
        assert!(view.occupancy("g2").unwrap().is_full);
    }

    #[test]
    fn test_groups_meeting_on() {
        let (view, _store) = setup_test();
        let sunday = view.groups_meeting_on("Sunday");
        assert_eq!(sunday.len(), 1);
        assert_eq!(sunday[0].id, "g1");
        assert!(view.groups_meeting_on("Friday").is_empty());
    }

    #[test]
    fn test_dashboard() {
        let (view, store) = setup_test();
        store
            .write(&[Collection::Students], |s| {
                s.require_student_mut("s1")?.attendance_rate = Some(100);
                s.require_student_mut("s3")?.attendance_rate = Some(67);
                Ok::<_, DomainError>(())
            })
            .unwrap();

        // 2024-03-03 is a Sunday
        let summary = view.dashboard(NaiveDate::from_ymd_opt(2024, 3, 3));
        assert_eq!(summary.student_count, 3);
        assert_eq!(summary.group_count, 2);
        // Students without a rate are left out of the average
        assert_eq!(summary.average_attendance_rate, 84);
        assert_eq!(summary.outstanding_debt, 150);
        assert_eq!(summary.income_on_day, 0);
        assert_eq!(summary.sessions_today, vec!["Physics - Grade 12 (A)".to_string()]);
        assert_eq!(summary.alerts, vec![DashboardAlert::SessionsToday { count: 1 }]);
    }

    #[test]
    fn test_dashboard_alerts() {
        let (view, store) = setup_test();
        store
            .write(&[Collection::Students], |s| {
                s.require_student_mut("s1")?.attendance_rate = Some(60);
                s.require_student_mut("s3")?.attendance_rate = Some(70);
                s.require_student_mut("s1")?.balance = 300;
                s.require_student_mut("s3")?.balance = 251;
                Ok::<_, DomainError>(())
            })
            .unwrap();

        // 2024-03-08 is a Friday
        let summary = view.dashboard(NaiveDate::from_ymd_opt(2024, 3, 8));
        assert_eq!(
            summary.alerts,
            vec![
                DashboardAlert::HighDebt { students: 2 },
                DashboardAlert::LowAttendance {
                    average: 65,
                    threshold: 75
                },
                DashboardAlert::SessionsToday { count: 0 },
            ]
        );

        let lenient = RosterView::new(
            store,
            AlertThresholds {
                high_debt: 1000,
                low_attendance: 50,
            },
        );
        assert_eq!(
            lenient.dashboard(NaiveDate::from_ymd_opt(2024, 3, 8)).alerts,
            vec![DashboardAlert::SessionsToday { count: 0 }]
        );
    }

    #[test]
    fn test_dashboard_without_rates_raises_no_attendance_alert() {
        let (view, _store) = setup_test();
        let summary = view.dashboard(NaiveDate::from_ymd_opt(2024, 3, 3));
        assert_eq!(summary.average_attendance_rate, 0);
        assert!(!summary
            .alerts
            .iter()
            .any(|a| matches!(a, DashboardAlert::LowAttendance { .. })));
    }

    #[test]
    fn test_dashboard_saturates_on_huge_amounts() {
        let (view, store) = setup_test();
        let day = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        store
            .write(&[Collection::Students, Collection::Transactions], |s| {
                s.require_student_mut("s1")?.balance = i64::MAX;
                s.require_student_mut("s3")?.balance = i64::MAX;
                for student_id in ["s1", "s3"] {
                    s.insert_transaction(Transaction {
                        id: Transaction::generate_id(TransactionKind::Payment),
                        student_id: student_id.to_string(),
                        student_name: String::new(),
                        amount: u64::MAX,
                        kind: TransactionKind::Payment,
                        date: day,
                        note: String::new(),
                    });
                }
                Ok::<_, DomainError>(())
            })
            .unwrap();

        let summary = view.dashboard(Some(day));
        assert_eq!(summary.outstanding_debt, i64::MAX);
        assert_eq!(summary.income_on_day, u64::MAX);
        assert_eq!(summary.alerts[0], DashboardAlert::HighDebt { students: 2 });
    }
}
