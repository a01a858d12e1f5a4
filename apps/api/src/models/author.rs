//! Author model for Quill
//!
//! This module contains the database model for authors together with the
//! validation rules shared by the batched and direct lookup paths.

use serde::Serialize;
use sqlx::FromRow;

/// Maximum accepted length of an author identifier
pub const MAX_AUTHOR_ID_LENGTH: usize = 64;

/// Author record from the authors table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Author {
    /// Unique author identifier (UUID v4 string for generated rows)
    pub id: String,

    /// Display name, never empty
    pub name: String,
}

/// Author creation input
#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
}

impl CreateAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Check the name is present, returning it trimmed
    pub fn validated_name(&self) -> Result<&str, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required.".to_string());
        }
        Ok(name)
    }
}

/// Validate an author identifier before it reaches the database
pub fn validate_author_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("author id must not be empty".to_string());
    }
    if id.chars().count() > MAX_AUTHOR_ID_LENGTH {
        return Err(format!(
            "author id must be at most {} characters",
            MAX_AUTHOR_ID_LENGTH
        ));
    }
    Ok(())
}
