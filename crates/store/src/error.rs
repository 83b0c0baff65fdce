//! Typed error enum for the store layer.
//!
//! Only the backends produce these; the [`crate::ChatStore`] facade swallows
//! every one of them at its boundary, so callers above the store never see a
//! transport error.

use thiserror::Error;

/// Store-layer error covering the durable backend's failure modes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema bootstrap failure.
    #[error("migration error: {0}")]
    Migration(String),

    /// Built-in persona seeding failure.
    #[error("seed error: {0}")]
    Seed(String),
}
