use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use models::course::{self, NewCourse};
use models::user::{self, Role};
use models::{course_enrollment, course_teacher};
use crate::{errors::ServiceError, pagination::Pagination};

async fn ensure_code_free(db: &DatabaseConnection, code: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
    let existing = course::Entity::find()
        .filter(course::Column::CourseCode.eq(course::normalize_code(code)))
        .one(db)
        .await?;
    match existing {
        Some(c) if Some(c.id) != except => Err(ServiceError::conflict(format!("course code already exists: {}", c.course_code))),
        _ => Ok(()),
    }
}

async fn user_with_role(db: &DatabaseConnection, id: Uuid, role: Role) -> Result<user::Model, ServiceError> {
    let u = user::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    if u.role() != Some(role) {
        return Err(ServiceError::Validation(format!("user {} is not a {}", u.username, role)));
    }
    Ok(u)
}

/// Create a course with a unique code.
pub async fn create_course(db: &DatabaseConnection, input: NewCourse) -> Result<course::Model, ServiceError> {
    input.validate()?;
    ensure_code_free(db, &input.course_code, None).await?;
    Ok(course::create(db, input).await?)
}

/// Replace all editable fields of a course.
pub async fn update_course(db: &DatabaseConnection, id: Uuid, input: NewCourse) -> Result<course::Model, ServiceError> {
    input.validate()?;
    let current = get_course(db, id).await?;
    ensure_code_free(db, &input.course_code, Some(id)).await?;
    let mut am: course::ActiveModel = current.into();
    am.name = Set(input.name.trim().to_string());
    am.course_code = Set(course::normalize_code(&input.course_code));
    am.description = Set(input.description);
    am.department = Set(input.department);
    am.credits = Set(input.credits);
    am.semester = Set(input.semester);
    am.start_date = Set(input.start_date);
    am.end_date = Set(input.end_date);
    am.capacity = Set(input.capacity);
    am.location = Set(input.location);
    am.schedule = Set(input.schedule);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn get_course(db: &DatabaseConnection, id: Uuid) -> Result<course::Model, ServiceError> {
    course::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("course"))
}

/// List courses with pagination, ordered by code.
pub async fn list_courses(db: &DatabaseConnection, opts: Pagination) -> Result<Vec<course::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    Ok(course::Entity::find()
        .order_by_asc(course::Column::CourseCode)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?)
}

pub async fn delete_course(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if course::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("course"));
    }
    Ok(())
}

/// A stored capacity below zero admits nobody.
fn at_capacity(capacity: i32, enrolled: u64) -> bool {
    u64::try_from(capacity).map_or(true, |cap| enrolled >= cap)
}

/// Enroll a student; duplicates conflict and capacity is enforced.
pub async fn enroll_student(db: &DatabaseConnection, course_id: Uuid, student_id: Uuid) -> Result<course_enrollment::Model, ServiceError> {
    let c = get_course(db, course_id).await?;
    user_with_role(db, student_id, Role::Student).await?;
    if course_enrollment::exists(db, course_id, student_id).await? {
        return Err(ServiceError::conflict("student already enrolled in this course"));
    }
    if let Some(capacity) = c.capacity {
        let enrolled = course_enrollment::Entity::find()
            .filter(course_enrollment::Column::CourseId.eq(course_id))
            .count(db)
            .await?;
        if at_capacity(capacity, enrolled) {
            return Err(ServiceError::conflict(format!("course {} is full", c.course_code)));
        }
    }
    Ok(course_enrollment::create(db, course_id, student_id).await?)
}

pub async fn unenroll_student(db: &DatabaseConnection, course_id: Uuid, student_id: Uuid) -> Result<(), ServiceError> {
    let res = course_enrollment::Entity::delete_many()
        .filter(course_enrollment::Column::CourseId.eq(course_id))
        .filter(course_enrollment::Column::StudentId.eq(student_id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("enrollment"));
    }
    Ok(())
}

/// Assign a faculty member to teach a course.
pub async fn assign_teacher(db: &DatabaseConnection, course_id: Uuid, teacher_id: Uuid) -> Result<course_teacher::Model, ServiceError> {
    get_course(db, course_id).await?;
    user_with_role(db, teacher_id, Role::Faculty).await?;
    if course_teacher::exists(db, course_id, teacher_id).await? {
        return Err(ServiceError::conflict("teacher already assigned to this course"));
    }
    Ok(course_teacher::create(db, course_id, teacher_id).await?)
}

pub async fn remove_teacher(db: &DatabaseConnection, course_id: Uuid, teacher_id: Uuid) -> Result<(), ServiceError> {
    let res = course_teacher::Entity::delete_many()
        .filter(course_teacher::Column::CourseId.eq(course_id))
        .filter(course_teacher::Column::TeacherId.eq(teacher_id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("teacher assignment"));
    }
    Ok(())
}

async fn users_by_ids(db: &DatabaseConnection, ids: Vec<Uuid>) -> Result<Vec<user::Model>, ServiceError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .order_by_asc(user::Column::FullName)
        .all(db)
        .await?)
}

async fn courses_by_ids(db: &DatabaseConnection, ids: Vec<Uuid>) -> Result<Vec<course::Model>, ServiceError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(course::Entity::find()
        .filter(course::Column::Id.is_in(ids))
        .order_by_asc(course::Column::CourseCode)
        .all(db)
        .await?)
}

pub async fn list_students(db: &DatabaseConnection, course_id: Uuid) -> Result<Vec<user::Model>, ServiceError> {
    let ids = course_enrollment::Entity::find()
        .filter(course_enrollment::Column::CourseId.eq(course_id))
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.student_id)
        .collect();
    users_by_ids(db, ids).await
}

pub async fn list_teachers(db: &DatabaseConnection, course_id: Uuid) -> Result<Vec<user::Model>, ServiceError> {
    let ids = course_teacher::Entity::find()
        .filter(course_teacher::Column::CourseId.eq(course_id))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.teacher_id)
        .collect();
    users_by_ids(db, ids).await
}

pub async fn courses_by_teacher(db: &DatabaseConnection, teacher_id: Uuid) -> Result<Vec<course::Model>, ServiceError> {
    let ids = course_teacher::Entity::find()
        .filter(course_teacher::Column::TeacherId.eq(teacher_id))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.course_id)
        .collect();
    courses_by_ids(db, ids).await
}

pub async fn courses_by_student(db: &DatabaseConnection, student_id: Uuid) -> Result<Vec<course::Model>, ServiceError> {
    let ids = course_enrollment::Entity::find()
        .filter(course_enrollment::Column::StudentId.eq(student_id))
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.course_id)
        .collect();
    courses_by_ids(db, ids).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, user_with_role as seed_user};

    #[test]
    fn capacity_limits() {
        assert!(!at_capacity(2, 1));
        assert!(at_capacity(2, 2));
        assert!(at_capacity(0, 0));
        assert!(at_capacity(-1, 0));
        assert!(at_capacity(i32::MIN, 5));
    }

    fn new_course(capacity: Option<i32>) -> NewCourse {
        NewCourse {
            name: "Compilers".into(),
            course_code: format!("cs-{}", &Uuid::new_v4().simple().to_string()[..8]),
            description: None,
            department: Some("CS".into()),
            credits: 4,
            semester: None,
            start_date: None,
            end_date: None,
            capacity,
            location: None,
            schedule: None,
        }
    }

    #[tokio::test]
    async fn enrollment_rules() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let c = create_course(&db, new_course(Some(1))).await?;
        let s1 = seed_user(&db, Role::Student).await?;
        let s2 = seed_user(&db, Role::Student).await?;
        let prof = seed_user(&db, Role::Faculty).await?;

        let dup_code = create_course(&db, NewCourse { course_code: c.course_code.to_lowercase(), ..new_course(None) }).await;
        assert!(matches!(dup_code, Err(ServiceError::Conflict(_))));

        enroll_student(&db, c.id, s1.id).await?;
        assert!(matches!(enroll_student(&db, c.id, s1.id).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(enroll_student(&db, c.id, s2.id).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(enroll_student(&db, c.id, prof.id).await, Err(ServiceError::Validation(_))));

        assign_teacher(&db, c.id, prof.id).await?;
        assert!(matches!(assign_teacher(&db, c.id, s1.id).await, Err(ServiceError::Validation(_))));
        assert_eq!(list_students(&db, c.id).await?.len(), 1);
        assert_eq!(courses_by_teacher(&db, prof.id).await?[0].id, c.id);
        assert_eq!(courses_by_student(&db, s1.id).await?[0].id, c.id);

        unenroll_student(&db, c.id, s1.id).await?;
        enroll_student(&db, c.id, s2.id).await?;
        remove_teacher(&db, c.id, prof.id).await?;
        assert!(list_teachers(&db, c.id).await?.is_empty());

        delete_course(&db, c.id).await?;
        for u in [s1, s2, prof] {
            user::Entity::delete_by_id(u.id).exec(&db).await?;
        }
        Ok(())
    }
}
