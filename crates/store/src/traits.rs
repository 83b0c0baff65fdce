//! Storage backend trait abstraction
//!
//! Defines async domain traits implemented by both the durable PostgreSQL
//! backend and the in-memory degraded backend, so the dual-mode facade can
//! run the same logical operation against either substrate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sahpaathi_core::{ChatMessage, Session, Teacher};

use crate::error::StoreError;

/// Session record operations.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session record.
    async fn insert_session(&self, session: &Session) -> Result<(), StoreError>;

    /// All sessions, most recently active first (`updated_at` descending).
    async fn list_sessions(&self) -> Result<Vec<Session>, StoreError>;

    /// Update a session's display name and bump `updated_at`.
    /// Returns `true` if a record matched.
    async fn rename_session(
        &self,
        session_id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Bump a session's `updated_at` after activity.
    async fn touch_session(&self, session_id: &str, now: DateTime<Utc>) -> Result<(), StoreError>;

    /// Delete one session record. Returns `true` if a record was removed.
    async fn delete_session(&self, session_id: &str) -> Result<bool, StoreError>;

    /// Delete every session record.
    async fn delete_all_sessions(&self) -> Result<(), StoreError>;
}

/// Conversational turn operations. Turns are append-only and owned by their
/// session; they have no identity of their own.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append one turn.
    async fn append_message(&self, message: &ChatMessage) -> Result<(), StoreError>;

    /// One session's turns, oldest first (`timestamp` ascending).
    async fn session_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, StoreError>;

    /// Every stored turn across all sessions. Ordering is backend-dependent:
    /// the durable backend returns one timestamp-sorted sequence, the
    /// in-memory backend returns each session's turns contiguously without
    /// cross-session sorting.
    async fn full_history(&self) -> Result<Vec<ChatMessage>, StoreError>;

    /// Bulk-delete one session's turns, keyed by `session_id`.
    async fn delete_session_messages(&self, session_id: &str) -> Result<(), StoreError>;

    /// Delete every stored turn.
    async fn delete_all_messages(&self) -> Result<(), StoreError>;
}

/// Teacher persona operations.
#[async_trait]
pub trait TeacherStore: Send + Sync {
    /// Insert a new persona record.
    async fn insert_teacher(&self, teacher: &Teacher) -> Result<(), StoreError>;

    /// Get a persona by id.
    async fn get_teacher(&self, teacher_id: &str) -> Result<Option<Teacher>, StoreError>;

    /// All personas sorted by name ascending.
    async fn list_teachers(&self) -> Result<Vec<Teacher>, StoreError>;

    /// Update a persona's prompt and bump `updated_at`.
    /// Returns `true` only if a record matched.
    async fn update_teacher_prompt(
        &self,
        teacher_id: &str,
        prompt: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Delete a persona only when it is custom. Built-in personas are never
    /// removed; the attempt returns `false`.
    async fn delete_teacher(&self, teacher_id: &str) -> Result<bool, StoreError>;
}
