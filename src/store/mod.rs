use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::accounts::model::Account;

pub mod documents;
pub mod memory;
pub mod postgres;

pub use documents::{Document, Documents, Stored};

/// The per-account document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Workouts,
    Meals,
    Nutrition,
    Goals,
    Achievements,
    WorkoutPlans,
    Progress,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Workouts => "workouts",
            Collection::Meals => "meals",
            Collection::Nutrition => "nutrition",
            Collection::Goals => "goals",
            Collection::Achievements => "achievements",
            Collection::WorkoutPlans => "workout_plans",
            Collection::Progress => "progress",
        }
    }
}

/// Raw JSON document as held by a backend.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: Uuid,
    pub collection: Collection,
    pub owner_id: Uuid,
    pub body: serde_json::Value,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for accounts and their documents.
///
/// Document operations are always scoped by `(collection, owner_id)`: a
/// document owned by someone else behaves exactly like a missing one.
/// Each call touches at most one document atomically; nothing spans
/// documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn insert_account(&self, account: Account) -> StoreResult<Account>;
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
    async fn get_account(&self, id: Uuid) -> StoreResult<Option<Account>>;
    /// Fails with [`StoreError::NotFound`] when the id is unknown.
    async fn update_account(&self, account: Account) -> StoreResult<Account>;

    async fn insert_document(&self, doc: StoredDocument) -> StoreResult<StoredDocument>;
    async fn get_document(
        &self,
        collection: Collection,
        owner_id: Uuid,
        id: Uuid,
    ) -> StoreResult<Option<StoredDocument>>;
    /// Newest first.
    async fn list_documents(
        &self,
        collection: Collection,
        owner_id: Uuid,
    ) -> StoreResult<Vec<StoredDocument>>;
    async fn replace_document(
        &self,
        collection: Collection,
        owner_id: Uuid,
        id: Uuid,
        body: serde_json::Value,
    ) -> StoreResult<Option<StoredDocument>>;
    async fn delete_document(
        &self,
        collection: Collection,
        owner_id: Uuid,
        id: Uuid,
    ) -> StoreResult<bool>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}
