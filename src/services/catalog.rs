//! Book catalog service: browsing, search and admin management

use chrono::{DateTime, Duration, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
    scheduling::RESERVATION_HOLD_HOURS,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books with optional search and genre filter.
    ///
    /// Stale holds are expired first so the listed statuses are accurate.
    pub async fn list_books(&self, query: &BookQuery, now: DateTime<Utc>) -> AppResult<Vec<Book>> {
        let cutoff = now - Duration::hours(RESERVATION_HOLD_HOURS);
        self.repository.books.expire_stale_holds(cutoff).await?;
        self.repository.books.list(query).await
    }

    /// Live search suggestions, capped at 5 entries
    pub async fn suggestions(&self, search: &str) -> AppResult<Vec<Book>> {
        if search.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repository.books.suggestions(search).await
    }

    /// Sorted distinct genres for the filter dropdown
    pub async fn genres(&self) -> AppResult<Vec<String>> {
        self.repository.books.genres().await
    }

    /// Get a single book
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a book to the collection (admin)
    pub async fn create_book(&self, book: &CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.create(book).await
    }

    /// Update book metadata (admin)
    pub async fn update_book(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.update(id, book).await
    }

    /// Remove a book from the collection (admin)
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}
