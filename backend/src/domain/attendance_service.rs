//! Attendance recording for the education center.
//!
//! Admits at most one record per student, per group, per calendar day and keeps
//! each student's attendance rate in step with the full attendance log.
//!
//! Both entry points (`mark_attendance` and `quick_admit`) share the same
//! uniqueness key. Scan-a-code admission marks the student in their primary
//! group, so a student can still be marked in another group on the same day.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::commands::attendance::{
    AttendanceListQuery, DailySummary, MarkAttendanceCommand, MarkAttendanceResult,
    QuickAdmitCommand,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::attendance::{attendance_rate, AttendanceRecord, AttendanceStatus};
use crate::domain::today_or;
use crate::storage::{Collection, RecordStore, StoreHandle};

/// Service enforcing the attendance uniqueness rule
#[derive(Clone)]
pub struct AttendanceService {
    store: StoreHandle,
}

impl AttendanceService {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Mark a student in one of their groups.
    ///
    /// Fails without mutating anything when the student or group is unknown,
    /// the student is not enrolled in the group, or the (student, group, day)
    /// slot is already taken.
    pub fn mark_attendance(&self, command: MarkAttendanceCommand) -> DomainResult<MarkAttendanceResult> {
        let date = today_or(command.date);
        info!(
            "Marking {} as {:?} in group {} on {}",
            command.student_id, command.status, command.group_id, date
        );

        self.store
            .write(&[Collection::Attendance, Collection::Students], |store| {
                let student = store.require_student(&command.student_id)?;
                store.require_group(&command.group_id)?;
                if !student.is_enrolled_in(&command.group_id) {
                    return Err(DomainError::NotEnrolled {
                        student_id: command.student_id.clone(),
                        group_id: command.group_id.clone(),
                    });
                }

                Self::admit(store, &command.student_id, &command.group_id, command.status, date)
            })
            .map_err(|e| {
                warn!("Attendance not recorded for {}: {}", command.student_id, e);
                e
            })
    }

    /// Scan-a-code admission: resolve the student by a case-insensitive id
    /// match and mark them present in their primary group.
    pub fn quick_admit(&self, command: QuickAdmitCommand) -> DomainResult<MarkAttendanceResult> {
        let date = today_or(command.date);
        let code = command.code.trim();
        info!("Quick admission for code {} on {}", code, date);

        self.store
            .write(&[Collection::Attendance, Collection::Students], |store| {
                let student = store
                    .students()
                    .iter()
                    .find(|s| s.id.eq_ignore_ascii_case(code))
                    .ok_or_else(|| DomainError::UnknownStudent(code.to_string()))?;
                let student_id = student.id.clone();
                let group_id = student
                    .primary_group()
                    .ok_or_else(|| DomainError::NoEnrolledGroup(student_id.clone()))?
                    .to_string();
                store.require_group(&group_id)?;

                Self::admit(store, &student_id, &group_id, AttendanceStatus::Present, date)
            })
            .map_err(|e| {
                warn!("Quick admission failed for code {}: {}", code, e);
                e
            })
    }

    /// Append the record and refresh the student's cached rate. Callers have
    /// already verified that the student exists.
    fn admit(
        store: &mut RecordStore,
        student_id: &str,
        group_id: &str,
        status: AttendanceStatus,
        date: NaiveDate,
    ) -> DomainResult<MarkAttendanceResult> {
        let record = AttendanceRecord {
            id: AttendanceRecord::generate_id(),
            student_id: student_id.to_string(),
            group_id: group_id.to_string(),
            date,
            status,
        };
        store.insert_record(record.clone())?;

        // Always at least one record after the insert above.
        let rate = attendance_rate(store.records_for_student(student_id)).unwrap_or(0);
        let student = store.require_student_mut(student_id)?;
        student.attendance_rate = Some(rate);

        info!(
            "Recorded {} for {} in {} on {}; attendance rate now {}%",
            record.id, student_id, group_id, date, rate
        );

        Ok(MarkAttendanceResult {
            record,
            attendance_rate: rate,
            student_name: student.name.clone(),
        })
    }

    /// Attendance records matching the query, most recent first
    pub fn list_records(&self, query: AttendanceListQuery) -> Vec<AttendanceRecord> {
        debug!("Listing attendance records: {:?}", query);
        self.store.read(|store| {
            store
                .attendance()
                .iter()
                .filter(|r| query.student_id.as_deref().map_or(true, |id| r.student_id == id))
                .filter(|r| query.group_id.as_deref().map_or(true, |id| r.group_id == id))
                .filter(|r| query.date.map_or(true, |date| r.date == date))
                .cloned()
                .collect()
        })
    }

    /// Attended (present or late), absent and unmarked counts for a group's
    /// enrolled students on one day
    pub fn daily_summary(&self, group_id: &str, date: Option<NaiveDate>) -> DomainResult<DailySummary> {
        let date = today_or(date);
        self.store.read(|store| {
            store.require_group(group_id)?;

            let (attended, absent) = store
                .attendance()
                .iter()
                .filter(|r| r.group_id == group_id && r.date == date)
                .fold((0, 0), |(attended, absent), r| {
                    if r.status.counts_as_attended() {
                        (attended + 1, absent)
                    } else {
                        (attended, absent + 1)
                    }
                });

            let not_marked = store
                .students()
                .iter()
                .filter(|s| s.is_enrolled_in(group_id) && !store.has_record(&s.id, group_id, date))
                .count();

            Ok(DailySummary {
                group_id: group_id.to_string(),
                date,
                attended,
                absent,
                not_marked,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::seed_store;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 2, d)
    }

    fn setup_test() -> (AttendanceService, StoreHandle) {
        let store = StoreHandle::in_memory(seed_store());
        (AttendanceService::new(store.clone()), store)
    }

    fn mark(student_id: &str, group_id: &str, status: AttendanceStatus, date: Option<NaiveDate>) -> MarkAttendanceCommand {
        MarkAttendanceCommand {
            student_id: student_id.to_string(),
            group_id: group_id.to_string(),
            status,
            date,
        }
    }

    #[test]
    fn test_concurrent_marks_record_one_entry() {
        const THREADS: usize = 8;
        let (service, store) = setup_test();
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let service = service.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    service.mark_attendance(mark("s1", "g1", AttendanceStatus::Present, day(5)))
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(DomainError::AlreadyMarked { .. })))
                .count(),
            THREADS - 1
        );
        assert_eq!(store.read(|s| s.attendance().len()), 1);
        assert_eq!(store.read(|s| s.student("s1").unwrap().attendance_rate), Some(100));
    }

    #[test]
    fn test_mark_attendance_twice_is_rejected() {
        let (service, store) = setup_test();

        let first = service
            .mark_attendance(mark("s1", "g1", AttendanceStatus::Present, day(1)))
            .unwrap();
        assert_eq!(first.attendance_rate, 100);

        let second = service.mark_attendance(mark("s1", "g1", AttendanceStatus::Present, day(1)));
        assert!(matches!(second, Err(DomainError::AlreadyMarked { .. })));

        // A different status does not bypass the rule either
        let third = service.mark_attendance(mark("s1", "g1", AttendanceStatus::Absent, day(1)));
        assert!(matches!(third, Err(DomainError::AlreadyMarked { .. })));

        assert_eq!(store.read(|s| s.attendance().len()), 1);
        assert_eq!(store.read(|s| s.student("s1").unwrap().attendance_rate), Some(100));
    }

    #[test]
    fn test_rate_of_present_absent_late() {
        let (service, store) = setup_test();
        service.mark_attendance(mark("s2", "g2", AttendanceStatus::Present, day(1))).unwrap();
        service.mark_attendance(mark("s2", "g2", AttendanceStatus::Absent, day(2))).unwrap();
        let result = service.mark_attendance(mark("s2", "g2", AttendanceStatus::Late, day(3))).unwrap();

        assert_eq!(result.attendance_rate, 67);
        assert_eq!(store.read(|s| s.student("s2").unwrap().attendance_rate), Some(67));
    }

    #[test]
    fn test_rate_spans_all_groups() {
        let store = StoreHandle::in_memory(seed_store());
        store
            .write(&[Collection::Students], |s| {
                s.require_student_mut("s1")?.group_ids.push("g2".to_string());
                Ok::<_, DomainError>(())
            })
            .unwrap();
        let service = AttendanceService::new(store.clone());

        service.mark_attendance(mark("s1", "g1", AttendanceStatus::Absent, day(1))).unwrap();
        let result = service.mark_attendance(mark("s1", "g2", AttendanceStatus::Present, day(1))).unwrap();

        // Same day in another group is allowed; the rate covers both groups
        assert_eq!(result.attendance_rate, 50);
    }

    #[test]
    fn test_unknown_ids_fail_fast() {
        let (service, store) = setup_test();

        let unknown_student = service.mark_attendance(mark("s99", "g1", AttendanceStatus::Present, day(1)));
        assert_eq!(unknown_student.unwrap_err(), DomainError::UnknownStudent("s99".to_string()));

        let unknown_group = service.mark_attendance(mark("s1", "g99", AttendanceStatus::Present, day(1)));
        assert_eq!(unknown_group.unwrap_err(), DomainError::UnknownGroup("g99".to_string()));

        let not_enrolled = service.mark_attendance(mark("s1", "g2", AttendanceStatus::Present, day(1)));
        assert!(matches!(not_enrolled, Err(DomainError::NotEnrolled { .. })));

        assert!(store.read(|s| s.attendance().is_empty()));
    }

    #[test]
    fn test_quick_admit_is_case_insensitive_and_uses_primary_group() {
        let (service, _store) = setup_test();
        let result = service
            .quick_admit(QuickAdmitCommand { code: " S3 ".to_string(), date: day(4) })
            .unwrap();

        assert_eq!(result.record.student_id, "s3");
        assert_eq!(result.record.group_id, "g1");
        assert_eq!(result.record.status, AttendanceStatus::Present);
        assert_eq!(result.student_name, "Yassin Ali Karim");
    }

    #[test]
    fn test_quick_admit_shares_the_uniqueness_key() {
        let (service, store) = setup_test();
        service.mark_attendance(mark("s1", "g1", AttendanceStatus::Late, day(5))).unwrap();

        let duplicate = service.quick_admit(QuickAdmitCommand { code: "s1".to_string(), date: day(5) });
        assert!(matches!(duplicate, Err(DomainError::AlreadyMarked { .. })));

        service.quick_admit(QuickAdmitCommand { code: "s1".to_string(), date: day(6) }).unwrap();
        assert_eq!(store.read(|s| s.attendance().len()), 2);
    }

    #[test]
    fn test_quick_admit_without_groups() {
        let store = StoreHandle::in_memory(seed_store());
        store
            .write(&[Collection::Students], |s| {
                s.require_student_mut("s3")?.group_ids.clear();
                Ok::<_, DomainError>(())
            })
            .unwrap();
        let service = AttendanceService::new(store);

        let result = service.quick_admit(QuickAdmitCommand { code: "s3".to_string(), date: day(1) });
        assert_eq!(result.unwrap_err(), DomainError::NoEnrolledGroup("s3".to_string()));

        let unknown = service.quick_admit(QuickAdmitCommand { code: "nobody".to_string(), date: day(1) });
        assert!(matches!(unknown, Err(DomainError::UnknownStudent(_))));
    }

    #[test]
    fn test_list_records_filters() {
        let (service, _store) = setup_test();
        service.mark_attendance(mark("s1", "g1", AttendanceStatus::Present, day(1))).unwrap();
        service.mark_attendance(mark("s3", "g1", AttendanceStatus::Absent, day(1))).unwrap();
        service.mark_attendance(mark("s1", "g1", AttendanceStatus::Present, day(2))).unwrap();

        let by_student = service.list_records(AttendanceListQuery {
            student_id: Some("s1".to_string()),
            ..Default::default()
        });
        assert_eq!(by_student.len(), 2);
        assert_eq!(by_student[0].date, day(2).unwrap());

        let by_date = service.list_records(AttendanceListQuery {
            date: day(1),
            ..Default::default()
        });
        assert_eq!(by_date.len(), 2);
    }

    #[test]
    fn test_daily_summary() {
        let (service, _store) = setup_test();
        service.mark_attendance(mark("s1", "g1", AttendanceStatus::Late, day(1))).unwrap();

        let summary = service.daily_summary("g1", day(1)).unwrap();
        assert_eq!(summary.attended, 1);
        assert_eq!(summary.absent, 0);
        assert_eq!(summary.not_marked, 1);

        service.mark_attendance(mark("s3", "g1", AttendanceStatus::Absent, day(1))).unwrap();
        let summary = service.daily_summary("g1", day(1)).unwrap();
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.not_marked, 0);

        assert!(service.daily_summary("g99", day(1)).is_err());
    }
}
