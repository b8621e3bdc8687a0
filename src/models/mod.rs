//! Data models for the Carrel API

pub mod book;
pub mod room;
pub mod student;
