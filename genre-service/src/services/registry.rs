//! In-memory genre registry.
//!
//! The registry owns the ordered collection of genres. Handlers receive it
//! through the router state, so every test can build an isolated instance.

use crate::models::Genre;
use serde::Deserialize;
use service_core::error::AppError;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const NOT_FOUND_MESSAGE: &str = "movie not found";

/// How `create` picks the id of a new record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdAllocation {
    /// `len + 1`. Can reissue a live id once something has been deleted.
    #[default]
    CollectionLength,
    /// One past the largest id this registry has ever held.
    Monotonic,
}

#[derive(Debug)]
struct Inner {
    genres: Vec<Genre>,
    highest_issued: i64,
}

#[derive(Debug, Clone)]
pub struct GenreRegistry {
    inner: Arc<RwLock<Inner>>,
    id_allocation: IdAllocation,
}

impl GenreRegistry {
    /// Registry holding the seed records.
    pub fn new(id_allocation: IdAllocation) -> Self {
        Self::with_genres(Genre::seed(), id_allocation)
    }

    pub fn with_genres(genres: Vec<Genre>, id_allocation: IdAllocation) -> Self {
        let highest_issued = genres.iter().map(|g| g.id).max().unwrap_or(0);

        Self {
            inner: Arc::new(RwLock::new(Inner {
                genres,
                highest_issued,
            })),
            id_allocation,
        }
    }

    pub fn id_allocation(&self) -> IdAllocation {
        self.id_allocation
    }

    pub async fn list(&self) -> Vec<Genre> {
        self.inner.read().await.genres.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.genres.len()
    }

    pub async fn get(&self, id: i64) -> Result<Genre, AppError> {
        let inner = self.inner.read().await;

        inner
            .genres
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    pub async fn create(&self, genre: String) -> Genre {
        let mut inner = self.inner.write().await;

        let id = match self.id_allocation {
            IdAllocation::CollectionLength => inner.genres.len() as i64 + 1,
            IdAllocation::Monotonic => inner.highest_issued + 1,
        };
        inner.highest_issued = inner.highest_issued.max(id);

        let record = Genre::new(id, genre);
        inner.genres.push(record.clone());

        record
    }

    /// Replaces the genre text; id and position stay put.
    pub async fn update(&self, id: i64, genre: String) -> Result<Genre, AppError> {
        let mut inner = self.inner.write().await;

        let record = inner
            .genres
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(not_found)?;
        record.genre = genre;

        Ok(record.clone())
    }

    pub async fn delete(&self, id: i64) -> Result<Genre, AppError> {
        let mut inner = self.inner.write().await;

        let index = inner
            .genres
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(not_found)?;
        let removed = inner.genres.remove(index);

        Ok(removed)
    }
}

impl Default for GenreRegistry {
    fn default() -> Self {
        Self::new(IdAllocation::default())
    }
}

fn not_found() -> AppError {
    AppError::NotFound(NOT_FOUND_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(genres: &[Genre]) -> Vec<i64> {
        genres.iter().map(|g| g.id).collect()
    }

    #[tokio::test]
    async fn starts_with_seed_records_in_order() {
        let registry = GenreRegistry::default();

        assert_eq!(registry.list().await, Genre::seed());
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let registry = GenreRegistry::default();

        match registry.get(999).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, NOT_FOUND_MESSAGE),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_appends_with_length_based_id() {
        let registry = GenreRegistry::default();

        let created = registry.create("comedy".to_string()).await;

        assert_eq!(created, Genre::new(4, "comedy"));
        assert_eq!(registry.list().await.last(), Some(&created));
    }

    #[tokio::test]
    async fn update_keeps_position() {
        let registry = GenreRegistry::default();

        let updated = registry.update(1, "actionplus".to_string()).await.unwrap();

        assert_eq!(updated, Genre::new(1, "actionplus"));
        assert_eq!(registry.list().await[0], updated);
        assert_eq!(ids(&registry.list().await), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn delete_shifts_later_records() {
        let registry = GenreRegistry::default();

        let removed = registry.delete(2).await.unwrap();

        assert_eq!(removed, Genre::new(2, "horror"));
        assert_eq!(ids(&registry.list().await), vec![1, 3]);
        assert!(registry.delete(2).await.is_err());
    }

    #[tokio::test]
    async fn length_allocation_can_reissue_a_live_id() {
        let registry = GenreRegistry::new(IdAllocation::CollectionLength);

        registry.delete(2).await.unwrap();
        let created = registry.create("western".to_string()).await;

        // Collides with "thriller", which still holds id 3.
        assert_eq!(created.id, 3);
        assert_eq!(ids(&registry.list().await), vec![1, 3, 3]);
    }

    #[tokio::test]
    async fn monotonic_allocation_never_reissues() {
        let registry = GenreRegistry::new(IdAllocation::Monotonic);

        registry.delete(3).await.unwrap();
        let first = registry.create("western".to_string()).await;
        registry.delete(first.id).await.unwrap();
        let second = registry.create("musical".to_string()).await;

        assert_eq!(first.id, 4);
        assert_eq!(second.id, 5);
    }

    #[tokio::test]
    async fn clones_share_the_same_collection() {
        let registry = GenreRegistry::default();
        let handle = registry.clone();

        handle.create("comedy".to_string()).await;

        assert_eq!(registry.len().await, 4);
    }

    #[test]
    fn id_allocation_reads_kebab_case() {
        let parsed: IdAllocation = serde_json::from_str("\"monotonic\"").unwrap();
        assert_eq!(parsed, IdAllocation::Monotonic);

        let parsed: IdAllocation = serde_json::from_str("\"collection-length\"").unwrap();
        assert_eq!(parsed, IdAllocation::CollectionLength);
    }
}
