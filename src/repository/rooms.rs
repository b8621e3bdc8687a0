//! Conference rooms repository
//!
//! A room's reservation list is the unit of concurrency: every mutation
//! locks the room row (`SELECT ... FOR UPDATE`) and re-reads the list
//! inside the same transaction, so two requests computing a slot for the
//! same room serialize instead of both appending the same interval.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::room::{ConferenceRoom, RoomReservation},
    scheduling,
};

#[derive(Clone)]
pub struct RoomsRepository {
    pool: Pool<Postgres>,
}

impl RoomsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get room by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<ConferenceRoom> {
        sqlx::query_as::<_, ConferenceRoom>("SELECT * FROM conference_rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conference room with id {} not found", id)))
    }

    /// List all rooms
    pub async fn list(&self) -> AppResult<Vec<ConferenceRoom>> {
        let rooms =
            sqlx::query_as::<_, ConferenceRoom>("SELECT * FROM conference_rooms ORDER BY room_name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rooms)
    }

    /// All reservations in a room, earliest first
    pub async fn reservations_for_room(&self, room_id: i32) -> AppResult<Vec<RoomReservation>> {
        let reservations = sqlx::query_as::<_, RoomReservation>(
            "SELECT * FROM room_reservations WHERE room_id = $1 ORDER BY start_time",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Whether a student holds a reservation in any room on any date
    pub async fn student_has_reservation(&self, student_id: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM room_reservations WHERE reserved_by = $1)",
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Drop every reservation that has already ended.
    ///
    /// Idempotent: keeps exactly the reservations with `end_time > now`.
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM room_reservations WHERE end_time <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Allocate the earliest free 90-minute slot on `date` and append the
    /// reservation, as one atomic read-modify-write on the room.
    pub async fn reserve_next_slot(
        &self,
        room_id: i32,
        date: NaiveDate,
        student_id: &str,
    ) -> AppResult<RoomReservation> {
        let mut tx = self.pool.begin().await?;

        let room_name: Option<String> = sqlx::query_scalar(
            "SELECT room_name FROM conference_rooms WHERE id = $1 FOR UPDATE",
        )
        .bind(room_id)
        .fetch_optional(&mut *tx)
        .await?;

        let room_name = room_name.ok_or_else(|| {
            AppError::NotFound(format!("Conference room with id {} not found", room_id))
        })?;

        let existing = sqlx::query_as::<_, RoomReservation>(
            "SELECT * FROM room_reservations WHERE room_id = $1 AND date = $2",
        )
        .bind(room_id)
        .bind(date)
        .fetch_all(&mut *tx)
        .await?;

        let start = scheduling::next_available_slot(date, &existing).ok_or_else(|| {
            AppError::BusinessRule(format!("No available slots for {} on {}", room_name, date))
        })?;
        let end = scheduling::slot_end(start);

        let reservation = sqlx::query_as::<_, RoomReservation>(
            r#"
            INSERT INTO room_reservations (room_id, reserved_by, date, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(room_id)
        .bind(student_id)
        .bind(date)
        .bind(start)
        .bind(end)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reservation)
    }

    /// Append a reservation at an exact start time, validating overlap
    /// and business-hours containment under the room lock.
    pub async fn add_reservation(
        &self,
        room_id: i32,
        student_id: &str,
        date: NaiveDate,
        start: DateTime<Utc>,
    ) -> AppResult<RoomReservation> {
        let end = scheduling::slot_end(start);

        if !scheduling::within_business_hours(date, start, end) {
            return Err(AppError::Validation(
                "Reservations must be between 8:00 AM and 6:00 PM".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let room_exists: Option<i32> =
            sqlx::query_scalar("SELECT id FROM conference_rooms WHERE id = $1 FOR UPDATE")
                .bind(room_id)
                .fetch_optional(&mut *tx)
                .await?;

        if room_exists.is_none() {
            return Err(AppError::NotFound(format!(
                "Conference room with id {} not found",
                room_id
            )));
        }

        let existing = sqlx::query_as::<_, RoomReservation>(
            "SELECT * FROM room_reservations WHERE room_id = $1 AND date = $2",
        )
        .bind(room_id)
        .bind(date)
        .fetch_all(&mut *tx)
        .await?;

        for res in &existing {
            if scheduling::overlaps(start, end, res.start_time, res.end_time) {
                return Err(AppError::Conflict(
                    "This time slot is already reserved".to_string(),
                ));
            }
        }

        let reservation = sqlx::query_as::<_, RoomReservation>(
            r#"
            INSERT INTO room_reservations (room_id, reserved_by, date, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(room_id)
        .bind(student_id)
        .bind(date)
        .bind(start)
        .bind(end)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reservation)
    }

    /// Remove a student's reservations in a room. Returns the number
    /// removed; zero is a no-op, not an error.
    pub async fn cancel_for_student(&self, room_id: i32, student_id: &str) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM room_reservations WHERE room_id = $1 AND reserved_by = $2")
                .bind(room_id)
                .bind(student_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
