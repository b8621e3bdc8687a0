//! Book catalog and circulation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, BookWithTiming, CreateBook, UpdateBook},
};

use super::AuthenticatedStudent;

/// Suggestions query parameter
#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SuggestionsQuery {
    pub search: String,
}

/// Status message response
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// List books with optional search and genre filter
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Books in the collection", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(_claims): AuthenticatedStudent,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books(&query, Utc::now()).await?;
    Ok(Json(books))
}

/// Live search suggestions (top 5 matches)
#[utoipa::path(
    get,
    path = "/books/suggestions",
    tag = "books",
    security(("bearer_auth" = [])),
    params(SuggestionsQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn suggestions(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(_claims): AuthenticatedStudent,
    Query(query): Query<SuggestionsQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.suggestions(&query.search).await?;
    Ok(Json(books))
}

/// Distinct genres for the filter dropdown
#[utoipa::path(
    get,
    path = "/books/genres",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sorted genre list", body = Vec<String>)
    )
)]
pub async fn genres(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(_claims): AuthenticatedStudent,
) -> AppResult<Json<Vec<String>>> {
    let genres = state.services.catalog.genres().await?;
    Ok(Json(genres))
}

/// Get a single book
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(_claims): AuthenticatedStudent,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(book_id).await?;
    Ok(Json(book))
}

/// The caller's active book(s) with countdown / late-fee info
#[utoipa::path(
    get,
    path = "/students/me/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active holds and loans", body = Vec<BookWithTiming>)
    )
)]
pub async fn my_books(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
) -> AppResult<Json<Vec<BookWithTiming>>> {
    let books = state
        .services
        .circulation
        .my_books(&claims.sub, Utc::now())
        .await?;
    Ok(Json(books))
}

/// Reserve a book (student)
#[utoipa::path(
    post,
    path = "/books/{id}/reserve",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book reserved", body = MessageResponse),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Student already holds a book")
    )
)]
pub async fn reserve_book(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Path(book_id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    claims.require_student()?;

    state
        .services
        .circulation
        .reserve_book(&claims.sub, book_id, Utc::now())
        .await?;

    Ok(Json(MessageResponse {
        message: "Book reserved successfully!".to_string(),
    }))
}

/// Cancel the caller's hold on a book (student)
#[utoipa::path(
    post,
    path = "/books/{id}/cancel",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = MessageResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Path(book_id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    claims.require_student()?;

    state
        .services
        .circulation
        .cancel_reservation(&claims.sub, book_id, Utc::now())
        .await?;

    Ok(Json(MessageResponse {
        message: "Book reservation cancelled successfully!".to_string(),
    }))
}

/// Add a book to the collection (admin)
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Missing required fields"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_admin()?;

    let book = state.services.catalog.create_book(&request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update book metadata (admin)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Path(book_id): Path<i32>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_admin()?;

    let book = state.services.catalog.update_book(book_id, &request).await?;
    Ok(Json(book))
}

/// Remove a book from the collection (admin)
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Path(book_id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.catalog.delete_book(book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All active holds and loans with timing info (admin)
#[utoipa::path(
    get,
    path = "/books/active",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active holds and loans", body = Vec<BookWithTiming>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn active_books(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
) -> AppResult<Json<Vec<BookWithTiming>>> {
    claims.require_admin()?;

    let books = state.services.circulation.active_books(Utc::now()).await?;
    Ok(Json(books))
}

/// Record a pickup: reserved → borrowed (admin)
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book marked borrowed", body = Book),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book is not awaiting pickup")
    )
)]
pub async fn mark_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Book>> {
    claims.require_admin()?;

    let book = state
        .services
        .circulation
        .mark_borrowed(book_id, Utc::now())
        .await?;
    Ok(Json(book))
}

/// Record a return: borrowed → available (admin)
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book marked returned", body = Book),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book is not currently borrowed")
    )
)]
pub async fn mark_returned(
    State(state): State<crate::AppState>,
    AuthenticatedStudent(claims): AuthenticatedStudent,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Book>> {
    claims.require_admin()?;

    let book = state
        .services
        .circulation
        .mark_returned(book_id, Utc::now())
        .await?;
    Ok(Json(book))
}
