//! Conference room booking service
//!
//! Every room-related read or write prunes already-ended reservations
//! first, so no stale entry is ever visible or blocks a new booking.
//! Student bookings are tomorrow-only with an auto-allocated slot;
//! admins place exact start times on any date.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::room::{
        AdminAddReservation, ReservationSlotView, RoomOverview, RoomReservation,
    },
    repository::Repository,
    scheduling,
};

#[derive(Clone)]
pub struct BookingService {
    repository: Repository,
}

impl BookingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Drop reservations that have already ended. Idempotent.
    pub async fn sweep_rooms(&self, now: DateTime<Utc>) -> AppResult<()> {
        let pruned = self.repository.rooms.prune_expired(now).await?;
        if pruned > 0 {
            tracing::info!("Pruned {} past conference room reservation(s)", pruned);
        }
        Ok(())
    }

    /// Whether a student may book a room (one reservation system-wide)
    pub async fn can_reserve_room(&self, student_id: &str) -> AppResult<bool> {
        Ok(!self
            .repository
            .rooms
            .student_has_reservation(student_id)
            .await?)
    }

    /// The calendar day after `now`, the only date students may book
    pub fn tomorrow(now: DateTime<Utc>) -> NaiveDate {
        (now + Duration::days(1)).date_naive()
    }

    /// Book the earliest free slot in a room for tomorrow.
    pub async fn reserve_for_tomorrow(
        &self,
        student_id: &str,
        room_id: i32,
        reservation_date: &str,
        now: DateTime<Utc>,
    ) -> AppResult<RoomReservation> {
        self.sweep_rooms(now).await?;

        if !self.can_reserve_room(student_id).await? {
            return Err(AppError::BusinessRule(
                "You can only reserve one conference room at a time".to_string(),
            ));
        }

        let date = parse_date(reservation_date)?;
        if date != Self::tomorrow(now) {
            return Err(AppError::Validation(
                "Conference rooms can only be reserved for the next day".to_string(),
            ));
        }

        self.repository
            .rooms
            .reserve_next_slot(room_id, date, student_id)
            .await
    }

    /// Cancel the student's own reservation(s) in a room. No-op when the
    /// student holds none.
    pub async fn cancel_own(
        &self,
        student_id: &str,
        room_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.sweep_rooms(now).await?;
        self.repository.rooms.get_by_id(room_id).await?;
        self.repository
            .rooms
            .cancel_for_student(room_id, student_id)
            .await
    }

    /// Place a reservation for a student at an exact start time (admin).
    pub async fn admin_add(
        &self,
        room_id: i32,
        request: &AdminAddReservation,
        now: DateTime<Utc>,
    ) -> AppResult<RoomReservation> {
        self.sweep_rooms(now).await?;

        let student = self
            .repository
            .students
            .get_student(&request.student_id)
            .await?;

        if !self.can_reserve_room(&student.id_number).await? {
            return Err(AppError::BusinessRule(format!(
                "Student {} already has a conference room reservation",
                student.id_number
            )));
        }

        let date = parse_date(&request.reservation_date)?;
        let time = NaiveTime::parse_from_str(&request.start_time, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid start time format (expected HH:MM)".to_string()))?;
        let start = date.and_time(time).and_utc();

        self.repository
            .rooms
            .add_reservation(room_id, &student.id_number, date, start)
            .await
    }

    /// Remove a student's reservation(s) in a room (admin override).
    pub async fn admin_cancel(
        &self,
        room_id: i32,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.sweep_rooms(now).await?;
        self.repository.rooms.get_by_id(room_id).await?;
        self.repository
            .rooms
            .cancel_for_student(room_id, student_id)
            .await
    }

    /// Per-room overview for the student dashboard: in-use status,
    /// tomorrow's bookings and (when the caller is eligible) the next
    /// free slot for tomorrow.
    pub async fn student_overview(
        &self,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<RoomOverview>> {
        self.sweep_rooms(now).await?;

        let tomorrow = Self::tomorrow(now);
        let eligible = self.can_reserve_room(student_id).await?;

        let rooms = self.repository.rooms.list().await?;
        let mut overviews = Vec::with_capacity(rooms.len());

        for room in rooms {
            let reservations = self.repository.rooms.reservations_for_room(room.id).await?;

            let mut overview = Self::base_overview(&room.room_name, room.id, &reservations, now);
            overview.reservations = reservations
                .iter()
                .filter(|r| r.date == tomorrow && !in_use(r, now))
                .map(slot_view)
                .collect();

            if eligible {
                if let Some(start) = scheduling::next_available_slot(tomorrow, &reservations) {
                    let end = scheduling::slot_end(start);
                    overview.next_available_slot = Some(start);
                    overview.next_slot_label = Some(time_label(start));
                    overview.next_slot_end_label = Some(time_label(end));
                }
            }

            overviews.push(overview);
        }

        Ok(overviews)
    }

    /// Per-room overview for the admin console, listing every upcoming
    /// reservation.
    pub async fn admin_overview(&self, now: DateTime<Utc>) -> AppResult<Vec<RoomOverview>> {
        self.sweep_rooms(now).await?;

        let rooms = self.repository.rooms.list().await?;
        let mut overviews = Vec::with_capacity(rooms.len());

        for room in rooms {
            let reservations = self.repository.rooms.reservations_for_room(room.id).await?;

            let mut overview = Self::base_overview(&room.room_name, room.id, &reservations, now);
            overview.reservations = reservations
                .iter()
                .filter(|r| !in_use(r, now))
                .map(slot_view)
                .collect();

            overviews.push(overview);
        }

        Ok(overviews)
    }

    fn base_overview(
        room_name: &str,
        room_id: i32,
        reservations: &[RoomReservation],
        now: DateTime<Utc>,
    ) -> RoomOverview {
        let current_status = reservations
            .iter()
            .find(|r| in_use(r, now))
            .map(|r| {
                format!(
                    "Currently in use by {} until {}",
                    r.reserved_by,
                    time_label(r.end_time)
                )
            })
            .unwrap_or_else(|| "Available".to_string());

        RoomOverview {
            room_id,
            room_name: room_name.to_string(),
            current_status,
            reservations: Vec::new(),
            next_available_slot: None,
            next_slot_label: None,
            next_slot_end_label: None,
        }
    }
}

fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (expected YYYY-MM-DD)".to_string()))
}

fn in_use(reservation: &RoomReservation, now: DateTime<Utc>) -> bool {
    now >= reservation.start_time && now <= reservation.end_time
}

/// "8:00 AM" style label
fn time_label(t: DateTime<Utc>) -> String {
    t.format("%-I:%M %p").to_string()
}

fn slot_view(reservation: &RoomReservation) -> ReservationSlotView {
    ReservationSlotView {
        reserved_by: reservation.reserved_by.clone(),
        time_frame: format!(
            "{}, {} - {}",
            reservation.start_time.format("%B %d, %Y"),
            time_label(reservation.start_time),
            time_label(reservation.end_time)
        ),
        start_time: reservation.start_time,
        end_time: reservation.end_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tomorrow_rolls_over_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 6, 30, 23, 30, 0).unwrap();
        assert_eq!(
            BookingService::tomorrow(now),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
        );
    }

    #[test]
    fn test_time_label_strips_leading_zero() {
        let t = Utc.with_ymd_and_hms(2025, 6, 12, 8, 0, 0).unwrap();
        assert_eq!(time_label(t), "8:00 AM");
        let t = Utc.with_ymd_and_hms(2025, 6, 12, 16, 30, 0).unwrap();
        assert_eq!(time_label(t), "4:30 PM");
    }

    #[test]
    fn test_parse_date_rejects_malformed() {
        assert!(parse_date("2025-06-12").is_ok());
        assert!(parse_date("12/06/2025").is_err());
        assert!(parse_date("tomorrow").is_err());
    }
}
