//! SQLite implementation of [`DocumentStore`].
//!
//! Documents are stored as JSON text. Transactional updates run inside one
//! SQLite write transaction: the first statement claims the database write
//! lock, so the document is read, mutated and written back while no other
//! writer can touch it. Competing writers wait on the busy timeout instead of
//! failing.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{Row, Sqlite};
use tracing::debug;
use uuid::Uuid;

use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::traits::{Document, DocumentMutation, DocumentStore, StoredDocument};

#[derive(Clone)]
pub struct SqliteDocumentStore {
    db: DbConnection,
}

impl SqliteDocumentStore {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn read_versioned<'e, E>(
        executor: E,
        collection: &str,
        id: &str,
    ) -> Result<Option<(Document, i64)>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query(
            r#"
            SELECT body, version
            FROM documents
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        match row {
            Some(r) => {
                let body: String = r.try_get("body")?;
                let version: i64 = r.try_get("version")?;
                Ok(Some((serde_json::from_str(&body)?, version)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(Self::read_versioned(self.db.pool(), collection, id)
            .await?
            .map(|(document, _)| document))
    }

    async fn set(&self, collection: &str, id: &str, document: &Document) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, version)
            VALUES (?, ?, ?, 0)
            ON CONFLICT (collection, id) DO UPDATE SET
                body = excluded.body,
                version = documents.version + 1,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(serde_json::to_string(document)?)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: &Map<String, Value>) -> Result<bool> {
        let fields = fields.clone();
        let merged = self
            .update_with(
                collection,
                id,
                Box::new(move |document| {
                    let mut object = match document {
                        Value::Object(object) => object,
                        _ => bail!("cannot merge fields into a document that is not a JSON object"),
                    };
                    for (key, value) in &fields {
                        object.insert(key.clone(), value.clone());
                    }
                    Ok(Value::Object(object))
                }),
            )
            .await?;
        Ok(merged.is_some())
    }

    async fn update_with(
        &self,
        collection: &str,
        id: &str,
        mutation: DocumentMutation,
    ) -> Result<Option<Document>> {
        // Dropping `tx` on any early return rolls the transaction back
        let mut tx = self.db.pool().begin().await?;

        // A write as the first statement takes the write lock up front, so
        // the read below can never be stale.
        let claimed = sqlx::query(
            r#"
            UPDATE documents
            SET version = version
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(collection)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            return Ok(None);
        }

        let (current, version) = match Self::read_versioned(&mut *tx, collection, id).await? {
            Some(found) => found,
            None => return Ok(None),
        };

        let updated = mutation(current)?;

        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = ?, version = version + 1, updated_at = CURRENT_TIMESTAMP
            WHERE collection = ? AND id = ? AND version = ?
            "#,
        )
        .bind(serde_json::to_string(&updated)?)
        .bind(collection)
        .bind(id)
        .bind(version)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() != 1 {
            bail!("document {}/{} changed while locked for update", collection, id);
        }

        tx.commit().await?;
        debug!("Updated {}/{} to version {}", collection, id, version + 1);

        Ok(Some(updated))
    }

    async fn add_to_subcollection(
        &self,
        collection: &str,
        id: &str,
        subcollection: &str,
        document: &Document,
    ) -> Result<String> {
        let document_id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO subdocuments (collection, parent_id, subcollection, id, body)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(subcollection)
        .bind(&document_id)
        .bind(serde_json::to_string(document)?)
        .execute(self.db.pool())
        .await?;

        Ok(document_id)
    }

    async fn stream_subcollection(
        &self,
        collection: &str,
        id: &str,
        subcollection: &str,
    ) -> Result<Vec<StoredDocument>> {
        let rows = sqlx::query(
            r#"
            SELECT id, body
            FROM subdocuments
            WHERE collection = ? AND parent_id = ? AND subcollection = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(subcollection)
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter()
            .map(|r| {
                let body: String = r.try_get("body")?;
                Ok(StoredDocument {
                    id: r.try_get("id")?,
                    data: serde_json::from_str(&body)?,
                })
            })
            .collect()
    }
}
