//! Remote preference store port.
//!
//! The store is a document database: records are JSON objects addressed by
//! a collection name and a key. Speech preferences live in the
//! [`SETTINGS_COLLECTION`] keyed by user id.

use async_trait::async_trait;

use super::PreferenceStoreError;

/// Collection holding per-user speech preference records.
pub const SETTINGS_COLLECTION: &str = "settings";

/// A stored record: top-level field name to JSON value.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Remote document store used for preference persistence.
///
/// # Design Rules
///
/// - `get_document` fails with `NotFound` rather than returning an empty
///   record; creating records is not this port's concern
/// - `update_document` replaces the given top-level fields and leaves the
///   others alone
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Fetch a record.
    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Document, PreferenceStoreError>;

    /// Overwrite the listed fields of an existing record.
    async fn update_document(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), PreferenceStoreError>;
}
