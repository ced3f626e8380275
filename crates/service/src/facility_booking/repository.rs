use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use models::{facility, facility_booking};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Listing filters for facility bookings.
#[derive(Clone, Copy, Debug)]
pub enum BookingQuery {
    All,
    Teacher(Uuid),
    Facility(Uuid),
    FacilityOnDate(Uuid, NaiveDate),
}

#[async_trait]
pub trait FacilityBookingRepository: Send + Sync {
    async fn facility(&self, id: Uuid) -> Result<Option<facility::Model>, ServiceError>;
    /// Non-cancelled bookings of `facility_id` on `date` overlapping `[start, end]`, minus `exclude`.
    async fn find_conflicts(
        &self,
        facility_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Result<Vec<facility_booking::Model>, ServiceError>;
    async fn insert(&self, teacher_id: Uuid, slot: facility_booking::BookingSlot) -> Result<facility_booking::Model, ServiceError>;
    /// Persist every mutable field of `booking`.
    async fn save(&self, booking: facility_booking::Model) -> Result<facility_booking::Model, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<facility_booking::Model>, ServiceError>;
    async fn list(&self, query: BookingQuery) -> Result<Vec<facility_booking::Model>, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmFacilityBookingRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl FacilityBookingRepository for SeaOrmFacilityBookingRepository {
    async fn facility(&self, id: Uuid) -> Result<Option<facility::Model>, ServiceError> {
        Ok(facility::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_conflicts(
        &self,
        facility_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Result<Vec<facility_booking::Model>, ServiceError> {
        Ok(facility_booking::find_conflicts(&self.db, facility_id, date, start, end, exclude).await?)
    }

    async fn insert(&self, teacher_id: Uuid, slot: facility_booking::BookingSlot) -> Result<facility_booking::Model, ServiceError> {
        Ok(facility_booking::create(&self.db, teacher_id, slot).await?)
    }

    async fn save(&self, booking: facility_booking::Model) -> Result<facility_booking::Model, ServiceError> {
        let am = facility_booking::ActiveModel {
            id: Set(booking.id),
            facility_id: Set(booking.facility_id),
            teacher_id: Set(booking.teacher_id),
            purpose: Set(booking.purpose),
            date: Set(booking.date),
            start_time: Set(booking.start_time),
            end_time: Set(booking.end_time),
            status: Set(booking.status),
            notes: Set(booking.notes),
            created_at: Set(booking.created_at),
            updated_at: Set(chrono::Utc::now().into()),
        };
        Ok(am.update(&self.db).await?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<facility_booking::Model>, ServiceError> {
        Ok(facility_booking::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list(&self, query: BookingQuery) -> Result<Vec<facility_booking::Model>, ServiceError> {
        use facility_booking::Column;
        let q = facility_booking::Entity::find();
        let q = match query {
            BookingQuery::All => q,
            BookingQuery::Teacher(id) => q.filter(Column::TeacherId.eq(id)),
            BookingQuery::Facility(id) => q.filter(Column::FacilityId.eq(id)),
            BookingQuery::FacilityOnDate(id, date) => q.filter(Column::FacilityId.eq(id)).filter(Column::Date.eq(date)),
        };
        Ok(q.order_by_asc(Column::Date).order_by_asc(Column::StartTime).all(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = facility_booking::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockFacilityBookingRepository {
        facilities: Mutex<HashMap<Uuid, facility::Model>>,
        bookings: Mutex<HashMap<Uuid, facility_booking::Model>>,
    }

    impl MockFacilityBookingRepository {
        /// Register an open, available facility with no opening hours and return its id.
        pub fn add_facility(&self, name: &str) -> Uuid {
            let now = chrono::Utc::now().into();
            let f = facility::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                description: None,
                location: "Campus".into(),
                facility_type: "CLASSROOM".into(),
                capacity: None,
                available: true,
                opening_time: None,
                closing_time: None,
                image_url: None,
                amenities: None,
                status: "AVAILABLE".into(),
                created_at: now,
                updated_at: now,
            };
            let id = f.id;
            self.facilities.lock().unwrap().insert(id, f);
            id
        }

        /// Replace a stored facility, e.g. to change its status or hours.
        pub fn put_facility(&self, f: facility::Model) {
            self.facilities.lock().unwrap().insert(f.id, f);
        }

        pub fn all(&self) -> Vec<facility_booking::Model> {
            self.bookings.lock().unwrap().values().cloned().collect()
        }
    }

    #[async_trait]
    impl FacilityBookingRepository for MockFacilityBookingRepository {
        async fn facility(&self, id: Uuid) -> Result<Option<facility::Model>, ServiceError> {
            Ok(self.facilities.lock().unwrap().get(&id).cloned())
        }

        async fn find_conflicts(
            &self,
            facility_id: Uuid,
            date: NaiveDate,
            start: NaiveTime,
            end: NaiveTime,
            exclude: Option<Uuid>,
        ) -> Result<Vec<facility_booking::Model>, ServiceError> {
            let bookings = self.bookings.lock().unwrap();
            Ok(bookings
                .values()
                .filter(|b| b.facility_id == facility_id && Some(b.id) != exclude && b.clashes_with(date, start, end))
                .cloned()
                .collect())
        }

        async fn insert(&self, teacher_id: Uuid, slot: facility_booking::BookingSlot) -> Result<facility_booking::Model, ServiceError> {
            slot.validate()?;
            let now = chrono::Utc::now().into();
            let b = facility_booking::Model {
                id: Uuid::new_v4(),
                facility_id: slot.facility_id,
                teacher_id,
                purpose: slot.purpose,
                date: slot.date,
                start_time: slot.start_time,
                end_time: slot.end_time,
                status: facility_booking::STATUS_CONFIRMED.into(),
                notes: slot.notes,
                created_at: now,
                updated_at: now,
            };
            self.bookings.lock().unwrap().insert(b.id, b.clone());
            Ok(b)
        }

        async fn save(&self, booking: facility_booking::Model) -> Result<facility_booking::Model, ServiceError> {
            let mut bookings = self.bookings.lock().unwrap();
            if !bookings.contains_key(&booking.id) {
                return Err(ServiceError::not_found("facility booking"));
            }
            bookings.insert(booking.id, booking.clone());
            Ok(booking)
        }

        async fn get(&self, id: Uuid) -> Result<Option<facility_booking::Model>, ServiceError> {
            Ok(self.bookings.lock().unwrap().get(&id).cloned())
        }

        async fn list(&self, query: BookingQuery) -> Result<Vec<facility_booking::Model>, ServiceError> {
            let bookings = self.bookings.lock().unwrap();
            let mut out: Vec<_> = bookings
                .values()
                .filter(|b| match query {
                    BookingQuery::All => true,
                    BookingQuery::Teacher(id) => b.teacher_id == id,
                    BookingQuery::Facility(id) => b.facility_id == id,
                    BookingQuery::FacilityOnDate(id, date) => b.facility_id == id && b.date == date,
                })
                .cloned()
                .collect();
            out.sort_by_key(|b| (b.date, b.start_time));
            Ok(out)
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.bookings.lock().unwrap().remove(&id).is_some())
        }
    }
}
