//! `SQLite` implementation of the `PreferenceStore` trait.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use parlance_core::{Document, PreferenceStore, PreferenceStoreError};

/// `SQLite` implementation of the `PreferenceStore` trait.
///
/// Each record is a JSON object stored in the `documents` table under
/// `(collection, key)`.
pub struct SqlitePreferenceStore {
    pool: SqlitePool,
}

impl SqlitePreferenceStore {
    /// Create a new `SQLite` document store.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create or fully replace a record.
    ///
    /// Not part of the port: the speech core never creates records. Used to
    /// seed a user's settings.
    pub async fn put_document(
        &self,
        collection: &str,
        key: &str,
        document: &Document,
    ) -> Result<(), PreferenceStoreError> {
        let body = serde_json::to_string(document)
            .map_err(|e| PreferenceStoreError::InvalidRecord(e.to_string()))?;

        sqlx::query(
            "INSERT OR REPLACE INTO documents (collection, key, body, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(collection)
        .bind(key)
        .bind(&body)
        .bind(timestamp())
        .execute(&self.pool)
        .await
        .map_err(transport)?;

        tracing::debug!(collection, key, "Document written");
        Ok(())
    }
}

fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn transport(e: sqlx::Error) -> PreferenceStoreError {
    PreferenceStoreError::Transport(e.to_string())
}

fn parse_body(body: &str) -> Result<Document, PreferenceStoreError> {
    match serde_json::from_str(body) {
        Ok(serde_json::Value::Object(doc)) => Ok(doc),
        Ok(_) => Err(PreferenceStoreError::InvalidRecord(
            "stored body is not a JSON object".to_string(),
        )),
        Err(e) => Err(PreferenceStoreError::InvalidRecord(e.to_string())),
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Document, PreferenceStoreError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND key = ?")
            .bind(collection)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(transport)?;

        match row {
            Some(r) => {
                let body: String = r.get("body");
                parse_body(&body)
            }
            None => Err(PreferenceStoreError::not_found(collection, key)),
        }
    }

    async fn update_document(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), PreferenceStoreError> {
        let mut tx = self.pool.begin().await.map_err(transport)?;

        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND key = ?")
            .bind(collection)
            .bind(key)
            .fetch_optional(&mut *tx)
            .await
            .map_err(transport)?;

        let Some(row) = row else {
            return Err(PreferenceStoreError::not_found(collection, key));
        };
        let body: String = row.get("body");
        let mut doc = parse_body(&body)?;
        doc.extend(fields);

        let merged = serde_json::to_string(&doc)
            .map_err(|e| PreferenceStoreError::InvalidRecord(e.to_string()))?;

        sqlx::query("UPDATE documents SET body = ?, updated_at = ? WHERE collection = ? AND key = ?")
            .bind(&merged)
            .bind(timestamp())
            .bind(collection)
            .bind(key)
            .execute(&mut *tx)
            .await
            .map_err(transport)?;

        tx.commit().await.map_err(transport)?;

        tracing::debug!(collection, key, "Document updated");
        Ok(())
    }
}
