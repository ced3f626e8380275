use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use common::metrics::ATTENDANCE_WRITTEN_TOTAL;
use models::attendance;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use super::repository::{AttendanceQuery, AttendanceRepository};

/// Single attendance mark.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewAttendance {
    pub student_id: Uuid,
    pub course_id: Uuid,
    /// Defaults to today (UTC).
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub status: String,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// One status applied to many students of a course on one day.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BulkAttendance {
    pub course_id: Uuid,
    pub student_ids: Vec<Uuid>,
    pub status: String,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AttendanceUpdate {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Share of PRESENT records as a percentage rounded to two decimals; 0 without records.
pub fn present_rate(records: &[attendance::Model]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let present = records.iter().filter(|r| r.is_present()).count() as f64;
    (present / records.len() as f64 * 100.0 * 100.0).round() / 100.0
}

pub struct AttendanceService<R: AttendanceRepository> {
    repo: Arc<R>,
}

impl<R: AttendanceRepository> AttendanceService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    async fn ensure_course(&self, course_id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.course_exists(course_id).await? {
            return Err(ServiceError::not_found("course"));
        }
        Ok(())
    }

    /// Record attendance for one enrolled student; a second record for the same day is a conflict.
    #[instrument(skip(self, input), fields(student_id = %input.student_id, course_id = %input.course_id))]
    pub async fn create(&self, input: NewAttendance, recorded_by: Option<Uuid>) -> Result<attendance::Model, ServiceError> {
        let status = attendance::validate_status(&input.status)?;
        self.ensure_course(input.course_id).await?;
        if !self.repo.is_enrolled(input.course_id, input.student_id).await? {
            return Err(ServiceError::Validation("student is not enrolled in this course".into()));
        }
        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
        if self.repo.find_same_day(input.student_id, input.course_id, date).await?.is_some() {
            return Err(ServiceError::conflict(format!("attendance already recorded for {date}")));
        }
        let record = attendance::new_record(input.student_id, input.course_id, date, status, input.remarks, recorded_by);
        let mut written = self.repo.write_batch(vec![record], Vec::new()).await?;
        ATTENDANCE_WRITTEN_TOTAL.inc();
        written.pop().ok_or_else(|| ServiceError::Db("attendance insert returned no row".into()))
    }

    /// Change status, remarks or date of a record.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: Uuid, update: AttendanceUpdate, recorded_by: Option<Uuid>) -> Result<attendance::Model, ServiceError> {
        let mut record = self.get(id).await?;
        if let Some(status) = update.status {
            record.status = attendance::validate_status(&status)?;
        }
        if let Some(remarks) = update.remarks {
            record.remarks = Some(remarks);
        }
        if let Some(date) = update.date.filter(|d| *d != record.date) {
            if self.repo.find_same_day(record.student_id, record.course_id, date).await?.is_some() {
                return Err(ServiceError::conflict(format!("attendance already recorded for {date}")));
            }
            record.date = date;
        }
        record.recorded_by = recorded_by.or(record.recorded_by);
        record.recorded_at = Utc::now().into();
        let mut written = self.repo.write_batch(Vec::new(), vec![record]).await?;
        ATTENDANCE_WRITTEN_TOTAL.inc();
        written.pop().ok_or_else(|| ServiceError::Db("attendance update returned no row".into()))
    }

    /// Mark many students at once. Existing same-day records are updated in place, so a
    /// student never ends up with two records for one course and day.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::attendance::{AttendanceService, BulkAttendance, repository::mock::MockAttendanceRepository};
    /// let repo = Arc::new(MockAttendanceRepository::default());
    /// let course = repo.add_course();
    /// let student = uuid::Uuid::new_v4();
    /// repo.enroll(course, student);
    /// let svc = AttendanceService::new(repo.clone());
    /// let bulk = BulkAttendance { course_id: course, student_ids: vec![student, student], status: "present".into(), remarks: None, date: None };
    /// let written = tokio_test::block_on(svc.bulk_create(bulk.clone(), None)).unwrap();
    /// assert_eq!(written.len(), 1);
    /// let again = tokio_test::block_on(svc.bulk_create(bulk, None)).unwrap();
    /// assert_eq!(again[0].id, written[0].id);
    /// assert_eq!(repo.all().len(), 1);
    /// ```
    #[instrument(skip(self, input), fields(course_id = %input.course_id, students = input.student_ids.len()))]
    pub async fn bulk_create(&self, input: BulkAttendance, recorded_by: Option<Uuid>) -> Result<Vec<attendance::Model>, ServiceError> {
        let status = attendance::validate_status(&input.status)?;
        if input.student_ids.is_empty() {
            return Err(ServiceError::Validation("student_ids must not be empty".into()));
        }
        self.ensure_course(input.course_id).await?;
        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());

        let mut students: Vec<Uuid> = Vec::with_capacity(input.student_ids.len());
        for id in input.student_ids {
            if !students.contains(&id) {
                students.push(id);
            }
        }

        let mut not_enrolled = Vec::new();
        for student_id in &students {
            if !self.repo.is_enrolled(input.course_id, *student_id).await? {
                not_enrolled.push(student_id.to_string());
            }
        }
        if !not_enrolled.is_empty() {
            return Err(ServiceError::Validation(format!("students not enrolled in this course: {}", not_enrolled.join(", "))));
        }

        let now = Utc::now().into();
        let (mut inserts, mut updates) = (Vec::new(), Vec::new());
        for student_id in students {
            match self.repo.find_same_day(student_id, input.course_id, date).await? {
                Some(mut existing) => {
                    existing.status = status.clone();
                    existing.remarks = input.remarks.clone();
                    existing.recorded_by = recorded_by;
                    existing.recorded_at = now;
                    updates.push(existing);
                }
                None => inserts.push(attendance::new_record(
                    student_id,
                    input.course_id,
                    date,
                    status.clone(),
                    input.remarks.clone(),
                    recorded_by,
                )),
            }
        }
        let (created, updated) = (inserts.len(), updates.len());
        let written = self.repo.write_batch(inserts, updates).await?;
        ATTENDANCE_WRITTEN_TOTAL.inc_by(written.len() as u64);
        info!(created, updated, %date, "bulk_attendance_written");
        Ok(written)
    }

    pub async fn get(&self, id: Uuid) -> Result<attendance::Model, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("attendance"))
    }

    pub async fn by_student(&self, student_id: Uuid) -> Result<Vec<attendance::Model>, ServiceError> {
        self.repo.query(AttendanceQuery::Student(student_id)).await
    }

    pub async fn by_course(&self, course_id: Uuid) -> Result<Vec<attendance::Model>, ServiceError> {
        self.repo.query(AttendanceQuery::Course(course_id)).await
    }

    pub async fn by_student_and_course(&self, student_id: Uuid, course_id: Uuid) -> Result<Vec<attendance::Model>, ServiceError> {
        self.repo.query(AttendanceQuery::StudentCourse(student_id, course_id)).await
    }

    pub async fn by_date_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<attendance::Model>, ServiceError> {
        check_range(from, to)?;
        self.repo.query(AttendanceQuery::DateRange(from, to)).await
    }

    pub async fn by_course_and_date_range(&self, course_id: Uuid, from: NaiveDate, to: NaiveDate) -> Result<Vec<attendance::Model>, ServiceError> {
        check_range(from, to)?;
        self.repo.query(AttendanceQuery::CourseDateRange(course_id, from, to)).await
    }

    pub async fn by_recorder(&self, recorder_id: Uuid) -> Result<Vec<attendance::Model>, ServiceError> {
        self.repo.query(AttendanceQuery::Recorder(recorder_id)).await
    }

    /// Attendance percentage of a student in one course.
    pub async fn percentage(&self, student_id: Uuid, course_id: Uuid) -> Result<f64, ServiceError> {
        Ok(present_rate(&self.by_student_and_course(student_id, course_id).await?))
    }

    /// Attendance percentage of a student across all courses.
    pub async fn overall_percentage(&self, student_id: Uuid) -> Result<f64, ServiceError> {
        Ok(present_rate(&self.by_student(student_id).await?))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("attendance"));
        }
        Ok(())
    }
}

fn check_range(from: NaiveDate, to: NaiveDate) -> Result<(), ServiceError> {
    if from > to {
        return Err(ServiceError::Validation("start date must not be after end date".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::repository::mock::MockAttendanceRepository;
    use std::collections::HashSet;

    fn d(day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2025, 2, day).unwrap() }

    fn setup(students: usize) -> (Arc<MockAttendanceRepository>, AttendanceService<MockAttendanceRepository>, Uuid, Vec<Uuid>) {
        let repo = Arc::new(MockAttendanceRepository::default());
        let course = repo.add_course();
        let ids: Vec<Uuid> = (0..students).map(|_| Uuid::new_v4()).collect();
        for s in &ids {
            repo.enroll(course, *s);
        }
        (repo.clone(), AttendanceService::new(repo), course, ids)
    }

    fn mark(student_id: Uuid, course_id: Uuid, day: u32, status: &str) -> NewAttendance {
        NewAttendance { student_id, course_id, date: Some(d(day)), status: status.into(), remarks: None }
    }

    #[tokio::test]
    async fn same_day_single_create_conflicts() {
        let (_, svc, course, s) = setup(1);
        let first = svc.create(mark(s[0], course, 3, "present"), None).await.unwrap();
        assert_eq!(first.status, "PRESENT");
        let again = svc.create(mark(s[0], course, 3, "ABSENT"), None).await;
        assert!(matches!(again, Err(ServiceError::Conflict(_))));
        svc.create(mark(s[0], course, 4, "ABSENT"), None).await.unwrap();
    }

    #[tokio::test]
    async fn create_requires_enrollment_and_valid_status() {
        let (_, svc, course, _) = setup(0);
        let stranger = svc.create(mark(Uuid::new_v4(), course, 3, "PRESENT"), None).await;
        assert!(matches!(stranger, Err(ServiceError::Validation(_))));
        let (_, svc, course, s) = setup(1);
        let bad = svc.create(mark(s[0], course, 3, "SLEEPING"), None).await;
        assert!(matches!(bad, Err(ServiceError::Model(_))));
        let no_course = svc.create(mark(s[0], Uuid::new_v4(), 3, "PRESENT"), None).await;
        assert!(matches!(no_course, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn bulk_upserts_existing_same_day_records() {
        let (repo, svc, course, s) = setup(3);
        let teacher = Uuid::new_v4();
        let existing = svc.create(mark(s[0], course, 5, "ABSENT"), None).await.unwrap();

        let bulk = BulkAttendance {
            course_id: course,
            student_ids: vec![s[0], s[1], s[2], s[1]],
            status: "late".into(),
            remarks: Some("bus strike".into()),
            date: Some(d(5)),
        };
        let written = svc.bulk_create(bulk, Some(teacher)).await.unwrap();
        assert_eq!(written.len(), 3);

        let all = repo.all();
        assert_eq!(all.len(), 3);
        let keys: HashSet<_> = all.iter().map(|r| (r.student_id, r.course_id, r.date)).collect();
        assert_eq!(keys.len(), all.len());

        let updated = svc.get(existing.id).await.unwrap();
        assert_eq!(updated.status, "LATE");
        assert_eq!(updated.recorded_by, Some(teacher));
        assert_eq!(svc.by_recorder(teacher).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn bulk_rejects_unenrolled_students_without_writing() {
        let (repo, svc, course, s) = setup(1);
        let bulk = BulkAttendance {
            course_id: course,
            student_ids: vec![s[0], Uuid::new_v4()],
            status: "PRESENT".into(),
            remarks: None,
            date: Some(d(6)),
        };
        assert!(matches!(svc.bulk_create(bulk, None).await, Err(ServiceError::Validation(_))));
        assert!(repo.all().is_empty());
    }

    #[tokio::test]
    async fn bulk_defaults_to_today() {
        let (_, svc, course, s) = setup(1);
        let bulk = BulkAttendance { course_id: course, student_ids: s.clone(), status: "PRESENT".into(), remarks: None, date: None };
        let written = svc.bulk_create(bulk, None).await.unwrap();
        assert_eq!(written[0].date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn percentages_round_to_two_decimals() {
        let (_, svc, course, s) = setup(1);
        assert_eq!(svc.percentage(s[0], course).await.unwrap(), 0.0);
        svc.create(mark(s[0], course, 1, "PRESENT"), None).await.unwrap();
        svc.create(mark(s[0], course, 2, "present"), None).await.unwrap();
        svc.create(mark(s[0], course, 3, "ABSENT"), None).await.unwrap();
        assert_eq!(svc.percentage(s[0], course).await.unwrap(), 66.67);
        assert_eq!(svc.overall_percentage(s[0]).await.unwrap(), 66.67);
    }

    #[tokio::test]
    async fn moving_a_record_onto_an_occupied_day_conflicts() {
        let (_, svc, course, s) = setup(1);
        svc.create(mark(s[0], course, 1, "PRESENT"), None).await.unwrap();
        let second = svc.create(mark(s[0], course, 2, "PRESENT"), None).await.unwrap();
        let moved = svc.update(second.id, AttendanceUpdate { date: Some(d(1)), ..Default::default() }, None).await;
        assert!(matches!(moved, Err(ServiceError::Conflict(_))));
        let same = svc.update(second.id, AttendanceUpdate { date: Some(d(2)), status: Some("excused".into()), remarks: None }, None).await.unwrap();
        assert_eq!(same.status, "EXCUSED");
    }

    #[tokio::test]
    async fn date_range_queries_are_inclusive() {
        let (_, svc, course, s) = setup(1);
        for day in 1..=5 {
            svc.create(mark(s[0], course, day, "PRESENT"), None).await.unwrap();
        }
        assert_eq!(svc.by_date_range(d(2), d(4)).await.unwrap().len(), 3);
        assert_eq!(svc.by_course_and_date_range(course, d(5), d(5)).await.unwrap().len(), 1);
        assert!(svc.by_date_range(d(4), d(2)).await.is_err());
        svc.delete(svc.by_course(course).await.unwrap()[0].id).await.unwrap();
        assert_eq!(svc.by_student(s[0]).await.unwrap().len(), 4);
    }
}
