//! Conference room reservation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::room::{AdminAddReservation, ReserveRoomRequest, RoomOverview, RoomReservation},
};

use super::AuthenticatedStudent;

/// Reservation response with the allocated slot
#[derive(Serialize, ToSchema)]
pub struct ReservationResponse {
    pub reservation: RoomReservation,
    pub message: String,
}

/// Cancellation response
#[derive(Serialize, ToSchema)]
pub struct CancellationResponse {
    /// Number of reservations removed (zero when there was nothing to cancel)
    pub cancelled: u64,
    pub message: String,
}

/// Room overview for the student dashboard
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Room statuses with tomorrow's bookings", body = Vec<RoomOverview>)
    )
)]
pub async fn list_rooms(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
) -> AppResult<Json<Vec<RoomOverview>>> {
    let overview = state
        .services
        .booking
        .student_overview(&claims.sub, Utc::now())
        .await?;
    Ok(Json(overview))
}

/// Room overview for the admin console, with all upcoming reservations
#[utoipa::path(
    get,
    path = "/rooms/overview",
    tag = "rooms",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Room statuses with all upcoming bookings", body = Vec<RoomOverview>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn admin_overview(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
) -> AppResult<Json<Vec<RoomOverview>>> {
    claims.require_admin()?;

    let overview = state.services.booking.admin_overview(Utc::now()).await?;
    Ok(Json(overview))
}

/// Reserve the next free slot in a room for tomorrow (student)
#[utoipa::path(
    post,
    path = "/rooms/{id}/reserve",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room ID")),
    request_body = ReserveRoomRequest,
    responses(
        (status = 201, description = "Slot reserved", body = ReservationResponse),
        (status = 400, description = "Date is not tomorrow or malformed"),
        (status = 404, description = "Room not found"),
        (status = 422, description = "Student already has a reservation or no slots left")
    )
)]
pub async fn reserve_room(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Path(room_id): Path<i32>,
    Json(request): Json<ReserveRoomRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    claims.require_student()?;

    let reservation = state
        .services
        .booking
        .reserve_for_tomorrow(&claims.sub, room_id, &request.reservation_date, Utc::now())
        .await?;

    let message = format!(
        "Successfully reserved for {} from {} to {}",
        reservation.date,
        reservation.start_time.format("%-I:%M %p"),
        reservation.end_time.format("%-I:%M %p")
    );

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse {
            reservation,
            message,
        }),
    ))
}

/// Cancel the caller's reservation in a room (student)
#[utoipa::path(
    post,
    path = "/rooms/{id}/cancel",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = CancellationResponse),
        (status = 404, description = "Room not found")
    )
)]
pub async fn cancel_room_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Path(room_id): Path<i32>,
) -> AppResult<Json<CancellationResponse>> {
    claims.require_student()?;

    let cancelled = state
        .services
        .booking
        .cancel_own(&claims.sub, room_id, Utc::now())
        .await?;

    Ok(Json(CancellationResponse {
        cancelled,
        message: "Reservation cancelled".to_string(),
    }))
}

/// Place a reservation for a student at an exact start time (admin)
#[utoipa::path(
    post,
    path = "/rooms/{id}/reservations",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room ID")),
    request_body = AdminAddReservation,
    responses(
        (status = 201, description = "Reservation created", body = ReservationResponse),
        (status = 400, description = "Malformed date/time or outside business hours"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Room or student not found"),
        (status = 409, description = "Slot overlaps an existing reservation"),
        (status = 422, description = "Student already has a reservation")
    )
)]
pub async fn add_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Path(room_id): Path<i32>,
    Json(request): Json<AdminAddReservation>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    claims.require_admin()?;

    let reservation = state
        .services
        .booking
        .admin_add(room_id, &request, Utc::now())
        .await?;

    let message = format!(
        "Successfully reserved for {} on {} from {} to {}",
        reservation.reserved_by,
        reservation.date,
        reservation.start_time.format("%-I:%M %p"),
        reservation.end_time.format("%-I:%M %p")
    );

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse {
            reservation,
            message,
        }),
    ))
}

/// Remove a student's reservation in a room (admin)
#[utoipa::path(
    delete,
    path = "/rooms/{id}/reservations/{student_id}",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Room ID"),
        ("student_id" = String, Path, description = "Student id number")
    ),
    responses(
        (status = 200, description = "Reservation cancelled", body = CancellationResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn admin_cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Path((room_id, student_id)): Path<(i32, String)>,
) -> AppResult<Json<CancellationResponse>> {
    claims.require_admin()?;

    let cancelled = state
        .services
        .booking
        .admin_cancel(room_id, &student_id, Utc::now())
        .await?;

    Ok(Json(CancellationResponse {
        cancelled,
        message: format!("Cancelled reservation(s) for {}", student_id),
    }))
}
