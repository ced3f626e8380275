use crate::{course, course_enrollment, facility, facility_booking, user, user_credentials};
use sea_orm::{EntityTrait, ModelTrait};
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use super::setup_test_db;

fn unique(prefix: &str) -> String { format!("{}{}", prefix, &Uuid::new_v4().simple().to_string()[..10]) }

#[tokio::test]
async fn test_user_and_credentials_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let username = unique("u");
    let u = user::create(&db, &username, "Test User", &format!("{username}@campus.edu"), None, user::Role::Student).await?;
    assert_eq!(u.role(), Some(user::Role::Student));
    assert!(u.enabled);

    let found = user::find_by_username(&db, &username).await?;
    assert_eq!(found.map(|f| f.id), Some(u.id));

    let c1 = user_credentials::upsert_password(&db, u.id, "hash-1".into(), "argon2").await?;
    let c2 = user_credentials::upsert_password(&db, u.id, "hash-2".into(), "argon2").await?;
    assert_eq!(c1.id, c2.id);
    assert_eq!(c2.password_hash, "hash-2");

    // Credentials cascade with the user
    user::Entity::delete_by_id(u.id).exec(&db).await?;
    assert!(user_credentials::find_by_user(&db, u.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let username = unique("dup");
    let u = user::create(&db, &username, "First", &format!("{username}@campus.edu"), None, user::Role::Faculty).await?;
    let second = user::create(&db, &username, "Second", &format!("other-{username}@campus.edu"), None, user::Role::Faculty).await;
    assert!(matches!(second, Err(crate::errors::ModelError::Db(_))));

    u.delete(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_course_enrollment_and_facility_conflict_query() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let teacher = user::create(&db, &unique("t"), "Teacher", &format!("{}@campus.edu", unique("t")), None, user::Role::Faculty).await?;
    let student = user::create(&db, &unique("s"), "Student", &format!("{}@campus.edu", unique("s")), None, user::Role::Student).await?;
    let c = course::create(&db, course::NewCourse {
        name: "Databases".into(),
        course_code: unique("DB-"),
        description: None,
        department: None,
        credits: 3,
        semester: None,
        start_date: None,
        end_date: None,
        capacity: Some(10),
        location: None,
        schedule: None,
    })
    .await?;

    course_enrollment::create(&db, c.id, student.id).await?;
    assert!(course_enrollment::exists(&db, c.id, student.id).await?);
    assert!(!course_enrollment::exists(&db, c.id, teacher.id).await?);

    let f = facility::create(&db, facility::NewFacility {
        name: unique("Hall "),
        description: None,
        location: "Main".into(),
        facility_type: "classroom".into(),
        capacity: Some(50),
        available: true,
        opening_time: None,
        closing_time: None,
        image_url: None,
        amenities: None,
        status: None,
    })
    .await?;
    assert_eq!(f.facility_type, "CLASSROOM");

    let date = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
    let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
    let b = facility_booking::create(&db, teacher.id, facility_booking::BookingSlot {
        facility_id: f.id,
        date,
        start_time: at(9),
        end_time: at(11),
        purpose: "Lecture".into(),
        notes: None,
    })
    .await?;

    assert_eq!(facility_booking::find_conflicts(&db, f.id, date, at(10), at(12), None).await?.len(), 1);
    assert_eq!(facility_booking::find_conflicts(&db, f.id, date, at(11), at(12), None).await?.len(), 1);
    assert!(facility_booking::find_conflicts(&db, f.id, date, at(12), at(13), None).await?.is_empty());
    assert!(facility_booking::find_conflicts(&db, f.id, date, at(9), at(11), Some(b.id)).await?.is_empty());

    // Cleanup (bookings and enrollments cascade)
    facility::Entity::delete_by_id(f.id).exec(&db).await?;
    course::Entity::delete_by_id(c.id).exec(&db).await?;
    user::Entity::delete_by_id(teacher.id).exec(&db).await?;
    user::Entity::delete_by_id(student.id).exec(&db).await?;
    Ok(())
}
