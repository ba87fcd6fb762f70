use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Collection, DocumentStore, StoreError, StoreResult, StoredDocument};
use crate::accounts::model::{Account, Profile};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    name: String,
    profile: Json<Profile>,
    token_version: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<AccountRow> for Account {
    fn from(r: AccountRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            name: r.name,
            profile: r.profile.0,
            token_version: r.token_version,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    owner_id: Uuid,
    body: serde_json::Value,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl DocumentRow {
    fn into_document(self, collection: Collection) -> StoredDocument {
        StoredDocument {
            id: self.id,
            collection,
            owner_id: self.owner_id,
            body: self.body,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, email, password_hash, name, profile, token_version, created_at, updated_at";

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;

        // Every query depends on the schema, so a failed migration is fatal.
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run database migrations")?;
        tracing::info!("database migrations applied");

        Ok(Self { db })
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_account(&self, account: Account) -> StoreResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (id, email, password_hash, name, profile, token_version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(Json(&account.profile))
        .bind(account.token_version)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(format!("email {}", account.email))
            }
            other => StoreError::Unexpected(anyhow::Error::new(other).context("insert account")),
        })?;
        Ok(row.into())
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find account by email")?;
        Ok(row.map(Account::from))
    }

    async fn get_account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get account")?;
        Ok(row.map(Account::from))
    }

    async fn update_account(&self, account: Account) -> StoreResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
               SET password_hash = $2, name = $3, profile = $4, token_version = $5, updated_at = now()
             WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.id)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(Json(&account.profile))
        .bind(account.token_version)
        .fetch_optional(&self.db)
        .await
        .context("update account")?;
        row.map(Account::from)
            .ok_or_else(|| StoreError::NotFound(format!("account {}", account.id)))
    }

    async fn insert_document(&self, doc: StoredDocument) -> StoreResult<StoredDocument> {
        let collection = doc.collection;
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (id, collection, owner_id, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, body, created_at, updated_at
            "#,
        )
        .bind(doc.id)
        .bind(collection.as_str())
        .bind(doc.owner_id)
        .bind(&doc.body)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .fetch_one(&self.db)
        .await
        .context("insert document")?;
        Ok(row.into_document(collection))
    }

    async fn get_document(
        &self,
        collection: Collection,
        owner_id: Uuid,
        id: Uuid,
    ) -> StoreResult<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, owner_id, body, created_at, updated_at
              FROM documents
             WHERE id = $1 AND collection = $2 AND owner_id = $3
            "#,
        )
        .bind(id)
        .bind(collection.as_str())
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await
        .context("get document")?;
        Ok(row.map(|r| r.into_document(collection)))
    }

    async fn list_documents(
        &self,
        collection: Collection,
        owner_id: Uuid,
    ) -> StoreResult<Vec<StoredDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, owner_id, body, created_at, updated_at
              FROM documents
             WHERE collection = $1 AND owner_id = $2
             ORDER BY created_at DESC, id
            "#,
        )
        .bind(collection.as_str())
        .bind(owner_id)
        .fetch_all(&self.db)
        .await
        .context("list documents")?;
        Ok(rows
            .into_iter()
            .map(|r| r.into_document(collection))
            .collect())
    }

    async fn replace_document(
        &self,
        collection: Collection,
        owner_id: Uuid,
        id: Uuid,
        body: serde_json::Value,
    ) -> StoreResult<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
               SET body = $4, updated_at = now()
             WHERE id = $1 AND collection = $2 AND owner_id = $3
            RETURNING id, owner_id, body, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(collection.as_str())
        .bind(owner_id)
        .bind(&body)
        .fetch_optional(&self.db)
        .await
        .context("replace document")?;
        Ok(row.map(|r| r.into_document(collection)))
    }

    async fn delete_document(
        &self,
        collection: Collection,
        owner_id: Uuid,
        id: Uuid,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE id = $1 AND collection = $2 AND owner_id = $3",
        )
        .bind(id)
        .bind(collection.as_str())
        .bind(owner_id)
        .execute(&self.db)
        .await
        .context("delete document")?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.db)
            .await
            .context("health check")?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
