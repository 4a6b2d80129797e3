//! Repository implementations backed by `SQLite`.

mod sqlite_preference_store;

pub use sqlite_preference_store::SqlitePreferenceStore;
