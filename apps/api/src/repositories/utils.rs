//! Shared SQL fragments for repositories

/// SQL columns for author queries
pub const AUTHOR_COLUMNS: &str = "id, name";

/// Maximum IDs bound into one `IN (...)` query, well below SQLite's
/// bound-parameter limit
pub const FIND_MANY_CHUNK_SIZE: usize = 500;

/// Authors inserted into an empty database on start-up
pub const DEFAULT_AUTHOR_NAMES: [&str; 2] = ["Author 1", "Author 2"];
