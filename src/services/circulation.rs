//! Book circulation service: holds, pickups, returns and hold expiry
//!
//! Every mutating operation sweeps expired holds first, then checks
//! eligibility, then commits the transition with a compare-and-set
//! update. Overdue loans are never auto-returned; the late fee keeps
//! accruing until an admin records the return.

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookStatus, BookWithTiming, TimingInfo},
    repository::Repository,
    scheduling::{self, HoldStatus, RESERVATION_HOLD_HOURS},
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Expire every hold older than 48 hours. Idempotent.
    pub async fn sweep_books(&self, now: DateTime<Utc>) -> AppResult<()> {
        let cutoff = now - Duration::hours(RESERVATION_HOLD_HOURS);
        let expired = self.repository.books.expire_stale_holds(cutoff).await?;
        if expired > 0 {
            tracing::info!("Expired {} stale book reservation(s)", expired);
        }
        Ok(())
    }

    /// Whether a student may place a new hold (one active book at a time)
    pub async fn can_reserve_book(&self, student_id: &str) -> AppResult<bool> {
        Ok(!self.repository.books.has_active(student_id).await?)
    }

    /// Place a hold on a book for a student.
    ///
    /// Losing the compare-and-set race is a silent no-op: the book was
    /// taken between listing and reserving, which is not the caller's
    /// error.
    pub async fn reserve_book(
        &self,
        student_id: &str,
        book_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        self.sweep_books(now).await?;

        self.repository.books.get_by_id(book_id).await?;

        if !self.can_reserve_book(student_id).await? {
            return Err(AppError::BusinessRule(
                "You can only reserve or borrow one book at a time".to_string(),
            ));
        }

        let reserved = self
            .repository
            .books
            .reserve_if_available(book_id, student_id, now)
            .await?;
        if !reserved {
            tracing::info!(
                "Reservation race lost on book {} by student {}",
                book_id,
                student_id
            );
        }

        Ok(())
    }

    /// Cancel the student's own hold. No-op when the student holds no
    /// reservation on the book.
    pub async fn cancel_reservation(
        &self,
        student_id: &str,
        book_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        self.sweep_books(now).await?;
        self.repository.books.get_by_id(book_id).await?;
        self.repository.books.cancel_hold(book_id, student_id).await?;
        Ok(())
    }

    /// Record a pickup: reserved → borrowed (admin).
    pub async fn mark_borrowed(&self, book_id: i32, now: DateTime<Utc>) -> AppResult<Book> {
        self.sweep_books(now).await?;

        let book = self.repository.books.get_by_id(book_id).await?;
        if !self.repository.books.mark_borrowed(book_id, now).await? {
            return Err(AppError::Conflict(format!(
                "Book is {} and cannot be marked borrowed",
                book.status
            )));
        }

        self.repository.books.get_by_id(book_id).await
    }

    /// Record a return: borrowed → available (admin).
    pub async fn mark_returned(&self, book_id: i32, now: DateTime<Utc>) -> AppResult<Book> {
        self.sweep_books(now).await?;

        let book = self.repository.books.get_by_id(book_id).await?;
        if !self.repository.books.mark_returned(book_id, now).await? {
            return Err(AppError::Conflict(format!(
                "Book is {} and cannot be marked returned",
                book.status
            )));
        }

        self.repository.books.get_by_id(book_id).await
    }

    /// The student's active book(s) with countdown info
    pub async fn my_books(
        &self,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<BookWithTiming>> {
        self.sweep_books(now).await?;

        let books = self.repository.books.active_for_student(student_id).await?;
        Ok(books
            .into_iter()
            .map(|book| Self::with_timing(book, now))
            .collect())
    }

    /// All active holds and loans, for the admin console
    pub async fn active_books(&self, now: DateTime<Utc>) -> AppResult<Vec<BookWithTiming>> {
        self.sweep_books(now).await?;

        let books = self.repository.books.list_active().await?;
        Ok(books
            .into_iter()
            .map(|book| Self::with_timing(book, now))
            .collect())
    }

    fn with_timing(book: Book, now: DateTime<Utc>) -> BookWithTiming {
        let timing_info = match book.status {
            BookStatus::Reserved => Some(TimingInfo::Hold(
                book.reserved_at
                    .map(|t| scheduling::remaining_hold_time(t, now))
                    .unwrap_or(HoldStatus {
                        has_expired: true,
                        remaining: "Expired".to_string(),
                    }),
            )),
            BookStatus::Borrowed => book
                .borrowed_at
                .map(|t| TimingInfo::Loan(scheduling::loan_standing(t, now))),
            BookStatus::Available => None,
        };
        BookWithTiming { book, timing_info }
    }
}
