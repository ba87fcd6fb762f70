use std::marker::PhantomData;

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Collection, DocumentStore, StoreError, StoreResult, StoredDocument};

/// A typed body living in one [`Collection`].
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
}

/// Typed document plus the bookkeeping fields every response carries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stored<D> {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub doc: D,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl<D: Document> Stored<D> {
    fn decode(raw: StoredDocument) -> StoreResult<Self> {
        let doc = serde_json::from_value(raw.body)
            .with_context(|| format!("decode {} document {}", D::COLLECTION.as_str(), raw.id))
            .map_err(StoreError::Unexpected)?;
        Ok(Self {
            id: raw.id,
            user_id: raw.owner_id,
            doc,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

fn encode<D: Document>(doc: &D) -> StoreResult<serde_json::Value> {
    serde_json::to_value(doc)
        .with_context(|| format!("encode {} document", D::COLLECTION.as_str()))
        .map_err(StoreError::Unexpected)
}

/// One account's view of one collection.
pub struct Documents<'a, D> {
    store: &'a dyn DocumentStore,
    owner_id: Uuid,
    _doc: PhantomData<D>,
}

impl<'a, D: Document> Documents<'a, D> {
    pub fn new(store: &'a dyn DocumentStore, owner_id: Uuid) -> Self {
        Self {
            store,
            owner_id,
            _doc: PhantomData,
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<Stored<D>>> {
        self.store
            .list_documents(D::COLLECTION, self.owner_id)
            .await?
            .into_iter()
            .map(Stored::<D>::decode)
            .collect()
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<Option<Stored<D>>> {
        self.store
            .get_document(D::COLLECTION, self.owner_id, id)
            .await?
            .map(Stored::<D>::decode)
            .transpose()
    }

    pub async fn insert(&self, doc: D) -> StoreResult<Stored<D>> {
        let now = OffsetDateTime::now_utc();
        let raw = StoredDocument {
            id: Uuid::new_v4(),
            collection: D::COLLECTION,
            owner_id: self.owner_id,
            body: encode(&doc)?,
            created_at: now,
            updated_at: now,
        };
        let saved = self.store.insert_document(raw).await?;
        Stored::<D>::decode(saved)
    }

    pub async fn replace(&self, id: Uuid, doc: &D) -> StoreResult<Option<Stored<D>>> {
        self.store
            .replace_document(D::COLLECTION, self.owner_id, id, encode(doc)?)
            .await?
            .map(Stored::<D>::decode)
            .transpose()
    }

    pub async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        self.store
            .delete_document(D::COLLECTION, self.owner_id, id)
            .await
    }
}
