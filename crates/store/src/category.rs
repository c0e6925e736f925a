//! Category record and repository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::CategoryId;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A category in the catalog hierarchy.
///
/// Categories form a tree via `parent_id`. Names are unique across the whole
/// catalog (case-insensitive). Categories are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    /// Unique display name, non-empty, at most 255 characters.
    pub name: String,

    /// Optional parent; `None` for root categories.
    pub parent_id: Option<CategoryId>,

    /// Optimistic concurrency token. `0` until first saved.
    #[serde(default)]
    pub version: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new unsaved category.
    pub fn new(name: impl Into<String>, parent_id: Option<CategoryId>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            parent_id,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Persistence port for categories.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Looks a category up by id.
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>>;

    /// Looks a category up by name. The match is case-insensitive, which is
    /// what makes name uniqueness case-insensitive catalog-wide.
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// Resolves a batch of ids. Missing ids are simply absent from the
    /// result; callers compare lengths to detect them.
    async fn find_by_ids(&self, ids: &[CategoryId]) -> Result<Vec<Category>>;

    /// Persists a category.
    ///
    /// A category with `version == 0` is inserted and comes back at version
    /// 1. Otherwise the stored row must still be at `category.version` or
    /// the save fails with [`StoreError::VersionConflict`]; on success the
    /// returned record carries the bumped version and a fresh `updated_at`.
    ///
    /// [`StoreError::VersionConflict`]: crate::StoreError::VersionConflict
    async fn save(&self, category: Category) -> Result<Category>;

    /// Returns all categories, oldest first.
    async fn list(&self) -> Result<Vec<Category>>;
}
