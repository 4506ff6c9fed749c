use crate::types::{FilterPredicate, Helper, HelperDraft};
use async_trait::async_trait;
use thiserror::Error;

pub mod in_memory;
pub mod supabase;

pub use in_memory::InMemoryStore;
pub use supabase::SupabaseStore;

/// Errors surfaced by a store implementation. The directory components
/// convert these into their own error kinds at the component boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// Uniqueness constraint violation; callers may treat this as a no-op.
    #[error("duplicate key")]
    Conflict,

    #[error("store rejected request: {status} - {message}")]
    Rejected { status: u16, message: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Query surface of the remote directory store.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// All helper columns, narrowed by the predicate's exact category filter
    /// and its case-insensitive first/last name substring filter. Both
    /// narrowings compose with AND. Row order is the store's.
    async fn list_helpers(&self, predicate: &FilterPredicate) -> StoreResult<Vec<Helper>>;

    /// All distinct category names.
    async fn list_categories(&self) -> StoreResult<Vec<String>>;

    /// Inserts a category name. Fails with `StoreError::Conflict` when the
    /// name already exists.
    async fn insert_category(&self, name: &str) -> StoreResult<()>;

    /// Inserts a helper row. `Ok(None)` means the insert succeeded but the
    /// store did not echo the created row back.
    async fn insert_helper(&self, draft: &HelperDraft) -> StoreResult<Option<Helper>>;
}
