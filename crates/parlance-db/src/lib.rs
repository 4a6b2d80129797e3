//! `SQLite` document store for parlance.
//!
//! Implements the [`PreferenceStore`](parlance_core::PreferenceStore) port
//! over a single `documents` table, so preference records survive between
//! sessions without a remote service.

#![deny(unsafe_code)]

pub mod repositories;
pub mod setup;

// Re-export repository implementations
pub use repositories::SqlitePreferenceStore;

// Re-export setup functions for convenient access
pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
