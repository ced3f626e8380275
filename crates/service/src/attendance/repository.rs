use async_trait::async_trait;
use chrono::NaiveDate;
use models::{attendance, course, course_enrollment};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Listing filters for attendance records.
#[derive(Clone, Copy, Debug)]
pub enum AttendanceQuery {
    Student(Uuid),
    Course(Uuid),
    StudentCourse(Uuid, Uuid),
    /// Inclusive on both ends.
    DateRange(NaiveDate, NaiveDate),
    CourseDateRange(Uuid, NaiveDate, NaiveDate),
    Recorder(Uuid),
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn course_exists(&self, course_id: Uuid) -> Result<bool, ServiceError>;
    async fn is_enrolled(&self, course_id: Uuid, student_id: Uuid) -> Result<bool, ServiceError>;
    async fn find_same_day(&self, student_id: Uuid, course_id: Uuid, date: NaiveDate) -> Result<Option<attendance::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<attendance::Model>, ServiceError>;
    async fn query(&self, query: AttendanceQuery) -> Result<Vec<attendance::Model>, ServiceError>;
    /// Apply all inserts and updates as one unit; returns inserts then updates.
    async fn write_batch(
        &self,
        inserts: Vec<attendance::Model>,
        updates: Vec<attendance::Model>,
    ) -> Result<Vec<attendance::Model>, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmAttendanceRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl AttendanceRepository for SeaOrmAttendanceRepository {
    async fn course_exists(&self, course_id: Uuid) -> Result<bool, ServiceError> {
        Ok(course::Entity::find_by_id(course_id).one(&self.db).await?.is_some())
    }

    async fn is_enrolled(&self, course_id: Uuid, student_id: Uuid) -> Result<bool, ServiceError> {
        Ok(course_enrollment::exists(&self.db, course_id, student_id).await?)
    }

    async fn find_same_day(&self, student_id: Uuid, course_id: Uuid, date: NaiveDate) -> Result<Option<attendance::Model>, ServiceError> {
        use attendance::Column;
        Ok(attendance::Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Date.eq(date))
            .one(&self.db)
            .await?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<attendance::Model>, ServiceError> {
        Ok(attendance::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn query(&self, query: AttendanceQuery) -> Result<Vec<attendance::Model>, ServiceError> {
        use attendance::Column;
        let q = attendance::Entity::find();
        let q = match query {
            AttendanceQuery::Student(id) => q.filter(Column::StudentId.eq(id)),
            AttendanceQuery::Course(id) => q.filter(Column::CourseId.eq(id)),
            AttendanceQuery::StudentCourse(s, c) => q.filter(Column::StudentId.eq(s)).filter(Column::CourseId.eq(c)),
            AttendanceQuery::DateRange(from, to) => q.filter(Column::Date.between(from, to)),
            AttendanceQuery::CourseDateRange(c, from, to) => q.filter(Column::CourseId.eq(c)).filter(Column::Date.between(from, to)),
            AttendanceQuery::Recorder(id) => q.filter(Column::RecordedBy.eq(id)),
        };
        Ok(q.order_by_asc(Column::Date).order_by_asc(Column::RecordedAt).all(&self.db).await?)
    }

    async fn write_batch(
        &self,
        inserts: Vec<attendance::Model>,
        updates: Vec<attendance::Model>,
    ) -> Result<Vec<attendance::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let mut out = Vec::with_capacity(inserts.len() + updates.len());
        for record in inserts {
            out.push(attendance::insert(&txn, record).await?);
        }
        for record in updates {
            let am = attendance::ActiveModel {
                id: Set(record.id),
                student_id: Set(record.student_id),
                course_id: Set(record.course_id),
                date: Set(record.date),
                status: Set(record.status),
                remarks: Set(record.remarks),
                recorded_by: Set(record.recorded_by),
                recorded_at: Set(record.recorded_at),
            };
            out.push(am.update(&txn).await?);
        }
        txn.commit().await?;
        Ok(out)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(attendance::Entity::delete_by_id(id).exec(&self.db).await?.rows_affected > 0)
    }
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAttendanceRepository {
        courses: Mutex<HashSet<Uuid>>,
        enrollments: Mutex<HashSet<(Uuid, Uuid)>>, // (course_id, student_id)
        records: Mutex<HashMap<Uuid, attendance::Model>>,
    }

    impl MockAttendanceRepository {
        pub fn add_course(&self) -> Uuid {
            let id = Uuid::new_v4();
            self.courses.lock().unwrap().insert(id);
            id
        }

        pub fn enroll(&self, course_id: Uuid, student_id: Uuid) {
            self.enrollments.lock().unwrap().insert((course_id, student_id));
        }

        pub fn all(&self) -> Vec<attendance::Model> {
            self.records.lock().unwrap().values().cloned().collect()
        }
    }

    #[async_trait]
    impl AttendanceRepository for MockAttendanceRepository {
        async fn course_exists(&self, course_id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.courses.lock().unwrap().contains(&course_id))
        }

        async fn is_enrolled(&self, course_id: Uuid, student_id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.enrollments.lock().unwrap().contains(&(course_id, student_id)))
        }

        async fn find_same_day(&self, student_id: Uuid, course_id: Uuid, date: NaiveDate) -> Result<Option<attendance::Model>, ServiceError> {
            let records = self.records.lock().unwrap();
            Ok(records
                .values()
                .find(|r| r.student_id == student_id && r.course_id == course_id && r.date == date)
                .cloned())
        }

        async fn get(&self, id: Uuid) -> Result<Option<attendance::Model>, ServiceError> {
            Ok(self.records.lock().unwrap().get(&id).cloned())
        }

        async fn query(&self, query: AttendanceQuery) -> Result<Vec<attendance::Model>, ServiceError> {
            let records = self.records.lock().unwrap();
            let mut out: Vec<_> = records
                .values()
                .filter(|r| match query {
                    AttendanceQuery::Student(id) => r.student_id == id,
                    AttendanceQuery::Course(id) => r.course_id == id,
                    AttendanceQuery::StudentCourse(s, c) => r.student_id == s && r.course_id == c,
                    AttendanceQuery::DateRange(from, to) => r.date >= from && r.date <= to,
                    AttendanceQuery::CourseDateRange(c, from, to) => r.course_id == c && r.date >= from && r.date <= to,
                    AttendanceQuery::Recorder(id) => r.recorded_by == Some(id),
                })
                .cloned()
                .collect();
            out.sort_by_key(|r| (r.date, r.recorded_at));
            Ok(out)
        }

        async fn write_batch(
            &self,
            inserts: Vec<attendance::Model>,
            updates: Vec<attendance::Model>,
        ) -> Result<Vec<attendance::Model>, ServiceError> {
            let mut records = self.records.lock().unwrap();
            if updates.iter().any(|u| !records.contains_key(&u.id)) {
                return Err(ServiceError::not_found("attendance"));
            }
            let out: Vec<_> = inserts.into_iter().chain(updates).collect();
            for r in &out {
                records.insert(r.id, r.clone());
            }
            Ok(out)
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.records.lock().unwrap().remove(&id).is_some())
        }
    }
}
