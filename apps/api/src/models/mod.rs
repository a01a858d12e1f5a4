//! Database models and types for Quill

pub mod author;

pub use author::{validate_author_id, Author, CreateAuthor};
