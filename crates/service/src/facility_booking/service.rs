use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use common::metrics::{BOOKINGS_CREATED_TOTAL, BOOKING_CONFLICTS_TOTAL};
use models::facility_booking;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use super::repository::{BookingQuery, FacilityBookingRepository};

/// Facility booking rules: bookable facility, opening hours, no overlapping slot.
pub struct FacilityBookingService<R: FacilityBookingRepository> {
    repo: Arc<R>,
}

impl<R: FacilityBookingRepository> FacilityBookingService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// True when no non-cancelled booking of the facility overlaps `[start, end]` on `date`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use chrono::{NaiveDate, NaiveTime};
    /// use service::facility_booking::{FacilityBookingService, repository::mock::MockFacilityBookingRepository};
    /// let repo = Arc::new(MockFacilityBookingRepository::default());
    /// let hall = repo.add_facility("Hall A");
    /// let svc = FacilityBookingService::new(repo);
    /// let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    /// let (s, e) = (NaiveTime::from_hms_opt(9, 0, 0).unwrap(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    /// assert!(tokio_test::block_on(svc.is_time_slot_available(hall, day, s, e, None)).unwrap());
    /// ```
    pub async fn is_time_slot_available(
        &self,
        facility_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<bool, ServiceError> {
        let conflicts = self.repo.find_conflicts(facility_id, date, start, end, exclude_booking_id).await?;
        Ok(conflicts.is_empty())
    }

    async fn check_slot(&self, slot: &facility_booking::BookingSlot, exclude: Option<Uuid>) -> Result<(), ServiceError> {
        slot.validate()?;
        let facility = self
            .repo
            .facility(slot.facility_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("facility"))?;
        if !facility.is_bookable() {
            return Err(ServiceError::Validation(format!("facility {} is not available for booking", facility.name)));
        }
        if !facility.within_hours(slot.start_time, slot.end_time) {
            return Err(ServiceError::Validation(format!("requested time is outside the opening hours of {}", facility.name)));
        }
        if !self.is_time_slot_available(slot.facility_id, slot.date, slot.start_time, slot.end_time, exclude).await? {
            BOOKING_CONFLICTS_TOTAL.inc();
            warn!(facility_id = %slot.facility_id, date = %slot.date, "booking_conflict");
            return Err(ServiceError::conflict("facility is already booked for the selected time slot"));
        }
        Ok(())
    }

    /// Book a slot for `teacher_id`; the booking starts CONFIRMED.
    #[instrument(skip(self, slot), fields(facility_id = %slot.facility_id, date = %slot.date))]
    pub async fn create(&self, teacher_id: Uuid, slot: facility_booking::BookingSlot) -> Result<facility_booking::Model, ServiceError> {
        self.check_slot(&slot, None).await?;
        let created = self.repo.insert(teacher_id, slot).await?;
        BOOKINGS_CREATED_TOTAL.inc();
        info!(booking_id = %created.id, "facility_booking_created");
        Ok(created)
    }

    /// Replace slot and details; the booking does not conflict with itself.
    #[instrument(skip(self, slot), fields(booking_id = %id))]
    pub async fn update(&self, id: Uuid, slot: facility_booking::BookingSlot) -> Result<facility_booking::Model, ServiceError> {
        let mut booking = self.get(id).await?;
        if booking.status == facility_booking::STATUS_CANCELLED {
            return Err(ServiceError::Validation("cancelled bookings cannot be changed".into()));
        }
        self.check_slot(&slot, Some(id)).await?;
        booking.facility_id = slot.facility_id;
        booking.date = slot.date;
        booking.start_time = slot.start_time;
        booking.end_time = slot.end_time;
        booking.purpose = slot.purpose.trim().to_string();
        booking.notes = slot.notes;
        self.repo.save(booking).await
    }

    /// Mark a booking CANCELLED, releasing its slot.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid) -> Result<facility_booking::Model, ServiceError> {
        let mut booking = self.get(id).await?;
        booking.status = facility_booking::STATUS_CANCELLED.to_string();
        let saved = self.repo.save(booking).await?;
        info!(booking_id = %id, "facility_booking_cancelled");
        Ok(saved)
    }

    pub async fn get(&self, id: Uuid) -> Result<facility_booking::Model, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("facility booking"))
    }

    pub async fn list(&self) -> Result<Vec<facility_booking::Model>, ServiceError> { self.repo.list(BookingQuery::All).await }

    pub async fn by_teacher(&self, teacher_id: Uuid) -> Result<Vec<facility_booking::Model>, ServiceError> {
        self.repo.list(BookingQuery::Teacher(teacher_id)).await
    }

    pub async fn by_facility(&self, facility_id: Uuid) -> Result<Vec<facility_booking::Model>, ServiceError> {
        self.repo.list(BookingQuery::Facility(facility_id)).await
    }

    pub async fn by_facility_and_date(&self, facility_id: Uuid, date: NaiveDate) -> Result<Vec<facility_booking::Model>, ServiceError> {
        self.repo.list(BookingQuery::FacilityOnDate(facility_id, date)).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("facility booking"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility_booking::repository::mock::MockFacilityBookingRepository;
    use facility_booking::BookingSlot;
    use models::schedule;

    fn t(h: u32, m: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, 0).unwrap() }

    // no two active bookings of the same facility and date overlap
    fn no_overlaps(bookings: &[facility_booking::Model]) -> bool {
        let active: Vec<_> = bookings.iter().filter(|b| b.status != facility_booking::STATUS_CANCELLED).collect();
        active.iter().enumerate().all(|(i, a)| {
            active[i + 1..].iter().all(|b| {
                a.facility_id != b.facility_id || a.date != b.date || !schedule::overlaps(a.start_time, a.end_time, b.start_time, b.end_time)
            })
        })
    }

    fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 3, 3).unwrap() }

    fn slot(facility_id: Uuid, start: NaiveTime, end: NaiveTime) -> BookingSlot {
        BookingSlot { facility_id, date: day(), start_time: start, end_time: end, purpose: "Lecture".into(), notes: None }
    }

    fn setup() -> (Arc<MockFacilityBookingRepository>, FacilityBookingService<MockFacilityBookingRepository>, Uuid) {
        let repo = Arc::new(MockFacilityBookingRepository::default());
        let hall = repo.add_facility("Hall A");
        (repo.clone(), FacilityBookingService::new(repo), hall)
    }

    #[tokio::test]
    async fn overlapping_booking_is_a_conflict() {
        let (_, svc, hall) = setup();
        let teacher = Uuid::new_v4();
        let first = svc.create(teacher, slot(hall, t(9, 0), t(11, 0))).await.unwrap();
        assert_eq!(first.status, facility_booking::STATUS_CONFIRMED);

        let clash = svc.create(teacher, slot(hall, t(10, 0), t(12, 0))).await;
        assert!(matches!(clash, Err(ServiceError::Conflict(_))));

        // touching endpoints count as overlap
        let touching = svc.create(teacher, slot(hall, t(11, 0), t(12, 0))).await;
        assert!(matches!(touching, Err(ServiceError::Conflict(_))));

        svc.create(teacher, slot(hall, t(11, 1), t(12, 0))).await.unwrap();
    }

    #[tokio::test]
    async fn other_day_or_facility_is_free() {
        let (repo, svc, hall) = setup();
        let lab = repo.add_facility("Lab 2");
        let teacher = Uuid::new_v4();
        svc.create(teacher, slot(hall, t(9, 0), t(11, 0))).await.unwrap();
        svc.create(teacher, slot(lab, t(9, 0), t(11, 0))).await.unwrap();
        let mut next_day = slot(hall, t(9, 0), t(11, 0));
        next_day.date = day().succ_opt().unwrap();
        svc.create(teacher, next_day).await.unwrap();
        assert_eq!(svc.list().await.unwrap().len(), 3);
        assert_eq!(svc.by_facility_and_date(hall, day()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_excludes_itself() {
        let (_, svc, hall) = setup();
        let b = svc.create(Uuid::new_v4(), slot(hall, t(9, 0), t(10, 0))).await.unwrap();
        // no-op time update
        let same = svc.update(b.id, slot(hall, t(9, 0), t(10, 0))).await.unwrap();
        assert_eq!(same.start_time, t(9, 0));
        // shifting within its own window
        let shifted = svc.update(b.id, slot(hall, t(9, 30), t(10, 30))).await.unwrap();
        assert_eq!(shifted.end_time, t(10, 30));
    }

    #[tokio::test]
    async fn update_into_another_booking_conflicts() {
        let (_, svc, hall) = setup();
        let teacher = Uuid::new_v4();
        svc.create(teacher, slot(hall, t(9, 0), t(10, 0))).await.unwrap();
        let b = svc.create(teacher, slot(hall, t(13, 0), t(14, 0))).await.unwrap();
        let res = svc.update(b.id, slot(hall, t(9, 30), t(10, 30))).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn cancelled_booking_frees_the_slot() {
        let (_, svc, hall) = setup();
        let b = svc.create(Uuid::new_v4(), slot(hall, t(9, 0), t(10, 0))).await.unwrap();
        svc.cancel(b.id).await.unwrap();
        assert!(svc.is_time_slot_available(hall, day(), t(9, 0), t(10, 0), None).await.unwrap());
        svc.create(Uuid::new_v4(), slot(hall, t(9, 0), t(10, 0))).await.unwrap();
        let upd = svc.update(b.id, slot(hall, t(15, 0), t(16, 0))).await;
        assert!(matches!(upd, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn invalid_range_and_unknown_facility() {
        let (_, svc, hall) = setup();
        let inverted = svc.create(Uuid::new_v4(), slot(hall, t(11, 0), t(10, 0))).await;
        assert!(matches!(inverted, Err(ServiceError::Model(_))));
        let unknown = svc.create(Uuid::new_v4(), slot(Uuid::new_v4(), t(9, 0), t(10, 0))).await;
        assert!(matches!(unknown, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.get(Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn opening_hours_and_maintenance_are_enforced() {
        let (repo, svc, hall) = setup();
        let mut f = stored_facility(&repo, hall).await;
        f.opening_time = Some(t(8, 0));
        f.closing_time = Some(t(18, 0));
        repo.put_facility(f.clone());
        let early = svc.create(Uuid::new_v4(), slot(hall, t(7, 0), t(9, 0))).await;
        assert!(matches!(early, Err(ServiceError::Validation(_))));

        f.status = "UNDER_MAINTENANCE".into();
        repo.put_facility(f);
        let closed = svc.create(Uuid::new_v4(), slot(hall, t(9, 0), t(10, 0))).await;
        assert!(matches!(closed, Err(ServiceError::Validation(_))));
    }

    async fn stored_facility(repo: &MockFacilityBookingRepository, id: Uuid) -> models::facility::Model {
        repo.facility(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn accepted_bookings_never_overlap() {
        let (repo, svc, hall) = setup();
        let teacher = Uuid::new_v4();
        // every start on a 15 minute grid with 45 minute and 90 minute lengths
        for start_min in (8 * 60..17 * 60).step_by(15) {
            for len in [45u32, 90] {
                let (s, e) = (start_min as u32, start_min as u32 + len);
                let _ = svc.create(teacher, slot(hall, t(s / 60, s % 60), t(e / 60, e % 60))).await;
            }
        }
        let all = repo.all();
        assert!(!all.is_empty());
        assert!(no_overlaps(&all));
    }
}
