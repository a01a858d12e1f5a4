//! Database repository layer for Quill
//!
//! This module provides the data access layer, centralizing all database
//! operations into reusable repositories.

pub mod author;
pub mod utils;

pub use author::AuthorRepository;
