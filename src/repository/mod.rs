//! Repository layer for database operations

pub mod books;
pub mod rooms;
pub mod students;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub rooms: rooms::RoomsRepository,
    pub students: students::StudentsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            rooms: rooms::RoomsRepository::new(pool.clone()),
            students: students::StudentsRepository::new(pool.clone()),
            pool,
        }
    }
}
