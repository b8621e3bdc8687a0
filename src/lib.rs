//! Carrel Campus Resource Reservation System
//!
//! A Rust implementation of the Carrel campus reservation server,
//! providing a REST JSON API for managing a circulating book collection
//! and bookable conference rooms.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
