//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::scheduling::{HoldStatus, LoanStanding};

/// Book circulation status (stored as text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Reserved,
    Borrowed,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Reserved => "reserved",
            BookStatus::Borrowed => "borrowed",
        }
    }

    /// Legal lifecycle transitions: available→reserved (student hold),
    /// reserved→borrowed (pickup), reserved→available (cancel or hold
    /// expiry), borrowed→available (return). Everything else is rejected.
    pub fn can_transition(self, next: BookStatus) -> bool {
        matches!(
            (self, next),
            (BookStatus::Available, BookStatus::Reserved)
                | (BookStatus::Reserved, BookStatus::Borrowed)
                | (BookStatus::Reserved, BookStatus::Available)
                | (BookStatus::Borrowed, BookStatus::Available)
        )
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(BookStatus::Available),
            "reserved" => Ok(BookStatus::Reserved),
            "borrowed" => Ok(BookStatus::Borrowed),
            _ => Err(format!("Invalid book status: {}", s)),
        }
    }
}

// SQLx conversion for BookStatus
impl sqlx::Type<Postgres> for BookStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Book model from database.
///
/// Invariants maintained by the repository: `reserved_by`/`reserved_at`
/// are present iff status is reserved or borrowed; `borrowed_at` is
/// present iff status is borrowed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: BookStatus,
    /// Student id number holding or borrowing the book
    pub reserved_by: Option<String>,
    pub reserved_at: Option<DateTime<Utc>>,
    pub borrowed_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Countdown info attached to an active book for display
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimingInfo {
    Hold(HoldStatus),
    Loan(LoanStanding),
}

/// Book together with its hold/loan standing
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookWithTiming {
    #[serde(flatten)]
    pub book: Book,
    pub timing_info: Option<TimingInfo>,
}

/// Book query parameters (search and genre filter)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring match against title, author and genre
    pub search: Option<String>,
    /// Exact genre filter
    pub genre: Option<String>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Genre is required"))]
    pub genre: String,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    #[validate(length(min = 1, message = "Genre cannot be empty"))]
    pub genre: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [BookStatus::Available, BookStatus::Reserved, BookStatus::Borrowed] {
            assert_eq!(status.as_str().parse::<BookStatus>().unwrap(), status);
        }
        assert!("lost".parse::<BookStatus>().is_err());
    }

    #[test]
    fn test_legal_transitions() {
        assert!(BookStatus::Available.can_transition(BookStatus::Reserved));
        assert!(BookStatus::Reserved.can_transition(BookStatus::Borrowed));
        assert!(BookStatus::Reserved.can_transition(BookStatus::Available));
        assert!(BookStatus::Borrowed.can_transition(BookStatus::Available));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!BookStatus::Available.can_transition(BookStatus::Borrowed));
        assert!(!BookStatus::Available.can_transition(BookStatus::Available));
        assert!(!BookStatus::Borrowed.can_transition(BookStatus::Reserved));
        assert!(!BookStatus::Borrowed.can_transition(BookStatus::Borrowed));
        assert!(!BookStatus::Reserved.can_transition(BookStatus::Reserved));
    }
}
