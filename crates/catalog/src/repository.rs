//! Author repository: the storage side of author queries.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use query::{SortKey, apply_sort};
use tokio::sync::RwLock;

use crate::Result;
use crate::author::Author;
use crate::params::AuthorsResourceParameters;

/// Read access to stored authors.
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Loads one author.
    async fn get_author(&self, id: EntityId) -> Result<Option<Author>>;

    /// Returns every author matching the filters in `params`, ordered by
    /// `sort`. Paging is left to the caller.
    async fn get_authors(
        &self,
        params: &AuthorsResourceParameters,
        sort: &[SortKey],
    ) -> Result<Vec<Author>>;
}

/// In-memory author store.
///
/// Insertion order is the default order when no sort keys are given.
#[derive(Clone, Default)]
pub struct InMemoryAuthorRepository {
    state: Arc<RwLock<AuthorsState>>,
}

#[derive(Default)]
struct AuthorsState {
    authors: Vec<Author>,
    index: HashMap<EntityId, usize>,
}

impl InMemoryAuthorRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `authors`.
    pub fn with_authors(authors: impl IntoIterator<Item = Author>) -> Self {
        let mut state = AuthorsState::default();
        for author in authors {
            state.insert(author);
        }
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Adds an author, replacing any stored author with the same ID.
    pub async fn insert(&self, author: Author) {
        self.state.write().await.insert(author);
    }

    /// Number of stored authors.
    pub async fn len(&self) -> usize {
        self.state.read().await.authors.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl AuthorsState {
    fn insert(&mut self, author: Author) {
        match self.index.get(&author.id) {
            Some(&pos) => self.authors[pos] = author,
            None => {
                self.index.insert(author.id, self.authors.len());
                self.authors.push(author);
            }
        }
    }
}

fn matches_filters(author: &Author, main_category: Option<&str>, search: Option<&str>) -> bool {
    let category_matches = main_category
        .is_none_or(|category| author.main_category.to_lowercase() == category.to_lowercase());

    category_matches
        && search.is_none_or(|search| {
            let needle = search.to_lowercase();
            [&author.main_category, &author.first_name, &author.last_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn get_author(&self, id: EntityId) -> Result<Option<Author>> {
        let state = self.state.read().await;
        Ok(state.index.get(&id).map(|&pos| state.authors[pos].clone()))
    }

    #[tracing::instrument(skip(self, params), fields(order_by = %params.collection.order_by))]
    async fn get_authors(
        &self,
        params: &AuthorsResourceParameters,
        sort: &[SortKey],
    ) -> Result<Vec<Author>> {
        let main_category = params.main_category_filter();
        let search = params.search_query_filter();

        // Filter and clone under one read lock so count and page agree.
        let filtered: Vec<Author> = {
            let state = self.state.read().await;
            state
                .authors
                .iter()
                .filter(|a| matches_filters(a, main_category, search))
                .cloned()
                .collect()
        };

        let sorted = apply_sort(filtered, sort)?;
        tracing::debug!(matched = sorted.len(), "filtered authors");
        Ok(sorted)
    }
}
