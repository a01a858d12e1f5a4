//! Author GraphQL type

use async_graphql::{Object, ID};

use crate::models::Author as DbAuthor;

/// Author information exposed via GraphQL
pub struct Author {
    inner: DbAuthor,
}

impl Author {
    /// Create a new GraphQL Author from a database Author
    pub fn new(author: DbAuthor) -> Self {
        Self { inner: author }
    }
}

impl From<DbAuthor> for Author {
    fn from(author: DbAuthor) -> Self {
        Self::new(author)
    }
}

#[Object]
impl Author {
    /// Unique author identifier
    async fn id(&self) -> ID {
        ID(self.inner.id.clone())
    }

    /// Author name
    async fn name(&self) -> &str {
        &self.inner.name
    }
}
