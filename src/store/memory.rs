//! In-memory [`DocumentStore`].
//!
//! Used for tests and for running without `DATABASE_URL`. Nothing
//! survives a restart. Maps sit behind `tokio::sync::RwLock`, so reads
//! run concurrently and each write is applied under one lock, which
//! gives the same per-document atomicity the Postgres backend offers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, DocumentStore, StoreError, StoreResult, StoredDocument};
use crate::accounts::model::Account;

#[derive(Clone, Default)]
pub struct MemoryStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
    /// Insertion order; `list_documents` walks it backwards.
    documents: Arc<RwLock<Vec<StoredDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }
}

fn owned_by(doc: &StoredDocument, collection: Collection, owner_id: Uuid, id: Uuid) -> bool {
    doc.id == id && doc.collection == collection && doc.owner_id == owner_id
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_account(&self, account: Account) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict(format!("email {}", account.email)));
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn get_account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn update_account(&self, mut account: Account) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;
        let slot = accounts
            .get_mut(&account.id)
            .ok_or_else(|| StoreError::NotFound(format!("account {}", account.id)))?;
        account.updated_at = OffsetDateTime::now_utc();
        *slot = account.clone();
        Ok(account)
    }

    async fn insert_document(&self, doc: StoredDocument) -> StoreResult<StoredDocument> {
        self.documents.write().await.push(doc.clone());
        Ok(doc)
    }

    async fn get_document(
        &self,
        collection: Collection,
        owner_id: Uuid,
        id: Uuid,
    ) -> StoreResult<Option<StoredDocument>> {
        let docs = self.documents.read().await;
        Ok(docs
            .iter()
            .find(|d| owned_by(d, collection, owner_id, id))
            .cloned())
    }

    async fn list_documents(
        &self,
        collection: Collection,
        owner_id: Uuid,
    ) -> StoreResult<Vec<StoredDocument>> {
        let docs = self.documents.read().await;
        Ok(docs
            .iter()
            .rev()
            .filter(|d| d.collection == collection && d.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn replace_document(
        &self,
        collection: Collection,
        owner_id: Uuid,
        id: Uuid,
        body: serde_json::Value,
    ) -> StoreResult<Option<StoredDocument>> {
        let mut docs = self.documents.write().await;
        let Some(doc) = docs
            .iter_mut()
            .find(|d| owned_by(d, collection, owner_id, id))
        else {
            return Ok(None);
        };
        doc.body = body;
        doc.updated_at = OffsetDateTime::now_utc();
        Ok(Some(doc.clone()))
    }

    async fn delete_document(
        &self,
        collection: Collection,
        owner_id: Uuid,
        id: Uuid,
    ) -> StoreResult<bool> {
        let mut docs = self.documents.write().await;
        let before = docs.len();
        docs.retain(|d| !owned_by(d, collection, owner_id, id));
        Ok(docs.len() != before)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
