//! Persistence layer for SAHPAATHI
//!
//! A dual-mode session store: PostgreSQL while the backend is reachable,
//! process-local maps from the first failure onward. The mode switch is
//! one-way per process; see [`ChatStore`].

mod chat_store;
mod error;
mod mem;
mod pg;
pub mod traits;

pub use chat_store::{ChatStore, StoreMode};
pub use error::StoreError;
pub use mem::MemStore;
pub use pg::PgStore;
