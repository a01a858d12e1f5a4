//! GraphQL type definitions

mod author;

pub use author::Author;
