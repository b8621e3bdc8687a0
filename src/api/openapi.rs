//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, rooms};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Carrel API",
        version = "1.0.0",
        description = "Campus Resource Reservation REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::suggestions,
        books::genres,
        books::get_book,
        books::my_books,
        books::reserve_book,
        books::cancel_reservation,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::active_books,
        books::mark_borrowed,
        books::mark_returned,
        // Rooms
        rooms::list_rooms,
        rooms::admin_overview,
        rooms::reserve_room,
        rooms::cancel_room_reservation,
        rooms::add_reservation,
        rooms::admin_cancel_reservation,
    ),
    components(
        schemas(
            // Auth
            crate::models::student::RegisterRequest,
            crate::models::student::LoginRequest,
            crate::models::student::StudentInfo,
            auth::LoginResponse,
            auth::RegisterResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::BookStatus,
            crate::models::book::BookWithTiming,
            crate::models::book::TimingInfo,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::scheduling::HoldStatus,
            crate::scheduling::LoanStanding,
            books::MessageResponse,
            // Rooms
            crate::models::room::ConferenceRoom,
            crate::models::room::RoomReservation,
            crate::models::room::RoomOverview,
            crate::models::room::ReservationSlotView,
            crate::models::room::ReserveRoomRequest,
            crate::models::room::AdminAddReservation,
            rooms::ReservationResponse,
            rooms::CancellationResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book catalog and circulation"),
        (name = "rooms", description = "Conference room reservations")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
