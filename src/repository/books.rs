//! Books repository for database operations
//!
//! All status changes go through conditional UPDATEs that name the
//! expected prior status, so concurrent requests cannot double-book or
//! skip a lifecycle step: the first writer wins and later writers see
//! zero affected rows.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BookStatus, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List books, optionally filtered by substring search and exact genre
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let search = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();
        let pattern = format!("%{}%", search);

        let books = match (!search.is_empty(), &query.genre) {
            (true, Some(genre)) => {
                sqlx::query_as::<_, Book>(
                    r#"
                    SELECT * FROM books
                    WHERE (LOWER(title) LIKE $1 OR LOWER(author) LIKE $1 OR LOWER(genre) LIKE $1)
                      AND genre = $2
                    ORDER BY title
                    "#,
                )
                .bind(&pattern)
                .bind(genre)
                .fetch_all(&self.pool)
                .await?
            }
            (true, None) => {
                sqlx::query_as::<_, Book>(
                    r#"
                    SELECT * FROM books
                    WHERE LOWER(title) LIKE $1 OR LOWER(author) LIKE $1 OR LOWER(genre) LIKE $1
                    ORDER BY title
                    "#,
                )
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await?
            }
            (false, Some(genre)) => {
                sqlx::query_as::<_, Book>(
                    "SELECT * FROM books WHERE genre = $1 ORDER BY title",
                )
                .bind(genre)
                .fetch_all(&self.pool)
                .await?
            }
            (false, None) => {
                sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(books)
    }

    /// Search suggestions for the live search bar, capped at 5
    pub async fn suggestions(&self, search: &str) -> AppResult<Vec<Book>> {
        let pattern = format!("%{}%", search.trim().to_lowercase());
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE LOWER(title) LIKE $1 OR LOWER(author) LIKE $1 OR LOWER(genre) LIKE $1
            ORDER BY title
            LIMIT 5
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Sorted distinct genres across the collection
    pub async fn genres(&self) -> AppResult<Vec<String>> {
        let genres: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT genre FROM books ORDER BY genre")
                .fetch_all(&self.pool)
                .await?;
        Ok(genres)
    }

    /// Create a new book (always starts available)
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, genre, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(BookStatus::Available)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update book metadata
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let existing = self.get_by_id(id).await?;

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $1, author = $2, genre = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(book.title.as_ref().unwrap_or(&existing.title))
        .bind(book.author.as_ref().unwrap_or(&existing.author))
        .bind(book.genre.as_ref().unwrap_or(&existing.genre))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Active (reserved or borrowed) books held by a student
    pub async fn active_for_student(&self, student_id: &str) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE reserved_by = $1 AND status IN ('reserved', 'borrowed')
            ORDER BY title
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Whether a student currently holds or borrows any book
    pub async fn has_active(&self, student_id: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM books
                WHERE reserved_by = $1 AND status IN ('reserved', 'borrowed')
            )
            "#,
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// All reserved or borrowed books, for the admin loans view
    pub async fn list_active(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE status IN ('reserved', 'borrowed')
            ORDER BY reserved_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Return every hold older than `cutoff` to the shelf.
    ///
    /// Idempotent: re-running with the same cutoff matches nothing new.
    pub async fn expire_stale_holds(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET status = $1, reserved_by = NULL, reserved_at = NULL
            WHERE status = $2 AND reserved_at < $3
            "#,
        )
        .bind(BookStatus::Available)
        .bind(BookStatus::Reserved)
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Place a hold iff the book is still available (compare-and-set).
    /// Returns false when another student got there first.
    pub async fn reserve_if_available(
        &self,
        book_id: i32,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET status = $1, reserved_by = $2, reserved_at = $3
            WHERE id = $4 AND status = $5
            "#,
        )
        .bind(BookStatus::Reserved)
        .bind(student_id)
        .bind(now)
        .bind(book_id)
        .bind(BookStatus::Available)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Release a hold iff it belongs to the student and is still a hold.
    pub async fn cancel_hold(&self, book_id: i32, student_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET status = $1, reserved_by = NULL, reserved_at = NULL
            WHERE id = $2 AND reserved_by = $3 AND status = $4
            "#,
        )
        .bind(BookStatus::Available)
        .bind(book_id)
        .bind(student_id)
        .bind(BookStatus::Reserved)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reserved → borrowed at pickup, stamping the loan start.
    pub async fn mark_borrowed(&self, book_id: i32, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET status = $1, borrowed_at = $2
            WHERE id = $3 AND status = $4
            "#,
        )
        .bind(BookStatus::Borrowed)
        .bind(now)
        .bind(book_id)
        .bind(BookStatus::Reserved)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Borrowed → available at return, clearing hold and loan fields.
    pub async fn mark_returned(&self, book_id: i32, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET status = $1, returned_at = $2,
                reserved_by = NULL, reserved_at = NULL, borrowed_at = NULL
            WHERE id = $3 AND status = $4
            "#,
        )
        .bind(BookStatus::Available)
        .bind(now)
        .bind(book_id)
        .bind(BookStatus::Borrowed)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
