//! Dual-mode session store.
//!
//! [`ChatStore`] satisfies every request from PostgreSQL while the backend is
//! reachable and switches to process-local maps the first time it is not.
//! The switch is one-way for the life of the process: session and message
//! operations demote and retry locally, teacher-persona operations report
//! failure to the caller without demoting. Callers above this facade never
//! see a transport error, only domain-level booleans, options and records.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use sahpaathi_core::{
    ChatMessage, DEFAULT_SESSION_NAME, HistoryEntry, Role, Session, SessionInfo, Teacher,
    TeacherInfo,
};
use uuid::Uuid;

use crate::error::StoreError;
use crate::mem::MemStore;
use crate::pg::PgStore;
use crate::traits::{MessageStore, SessionStore, TeacherStore};

/// Which substrate operations currently run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Backed by PostgreSQL.
    Durable,
    /// Backed by in-process maps; entered irreversibly.
    Degraded,
}

/// The persistence facade handed to the routing layer.
///
/// Constructed once per process and shared behind an `Arc`.
#[derive(Debug)]
pub struct ChatStore {
    pg: Option<PgStore>,
    mem: MemStore,
    /// One-way latch. [`ChatStore::demote`] is its only writer and only ever
    /// sets it; nothing clears it, so `Degraded -> Durable` cannot be
    /// expressed.
    degraded: AtomicBool,
}

impl ChatStore {
    /// Connect to the durable backend, bounded by the pool acquire timeout.
    ///
    /// Never fails: an unreachable backend is logged and the store starts
    /// degraded.
    pub async fn connect(database_url: &str) -> Self {
        match PgStore::connect(database_url).await {
            Ok(pg) => {
                tracing::info!("chat store running on durable backend");
                Self { pg: Some(pg), mem: MemStore::default(), degraded: AtomicBool::new(false) }
            },
            Err(err) => {
                tracing::error!(%err, "durable backend unreachable at startup, running on in-memory store");
                Self { pg: None, mem: MemStore::default(), degraded: AtomicBool::new(true) }
            },
        }
    }

    /// A store with no durable backend at all, e.g. when no database URL is
    /// configured.
    #[must_use]
    pub fn degraded() -> Self {
        Self { pg: None, mem: MemStore::default(), degraded: AtomicBool::new(true) }
    }

    #[must_use]
    pub fn mode(&self) -> StoreMode {
        if self.degraded.load(Ordering::SeqCst) { StoreMode::Degraded } else { StoreMode::Durable }
    }

    /// The durable backend, if it is still the active substrate.
    fn durable(&self) -> Option<&PgStore> {
        match self.mode() {
            StoreMode::Durable => self.pg.as_ref(),
            StoreMode::Degraded => None,
        }
    }

    /// The single allowed mode transition: `Durable -> Degraded`.
    ///
    /// Concurrent in-flight failures race here; only the first one logs at
    /// error level.
    fn demote(&self, op: &'static str, err: &StoreError) {
        if self.degraded.swap(true, Ordering::SeqCst) {
            tracing::debug!(%err, op, "durable backend failure after demotion");
        } else {
            tracing::error!(
                %err,
                op,
                "durable backend failed, continuing on in-memory store for the rest of the process"
            );
        }
    }

    // ── Session operations ───────────────────────────────────────

    /// Create a session and return its id. `name` falls back to
    /// `"New Chat"` when absent or blank. Never fails from the caller's
    /// perspective.
    pub async fn create_session(&self, name: Option<&str>) -> String {
        let session =
            Session::new(Uuid::new_v4().to_string(), display_name(name), Utc::now());
        if let Some(pg) = self.durable() {
            match pg.insert_session(&session).await {
                Ok(()) => return session.session_id,
                Err(err) => self.demote("create_session", &err),
            }
        }
        let session_id = session.session_id.clone();
        self.mem.insert_session(session);
        session_id
    }

    /// All sessions, most recently active first, timestamps normalized to
    /// RFC 3339 strings.
    pub async fn list_sessions(&self) -> Vec<SessionInfo> {
        if let Some(pg) = self.durable() {
            match pg.list_sessions().await {
                Ok(sessions) => return sessions.iter().map(SessionInfo::from).collect(),
                Err(err) => self.demote("list_sessions", &err),
            }
        }
        self.mem.list_sessions().iter().map(SessionInfo::from).collect()
    }

    /// Rename a session and bump its `updated_at`.
    ///
    /// Returns `false` only when the in-memory store does not know the id;
    /// the durable path reports success without checking whether a row
    /// matched. Longstanding API behavior, kept as-is.
    pub async fn rename_session(&self, session_id: &str, name: &str) -> bool {
        let now = Utc::now();
        if let Some(pg) = self.durable() {
            match pg.rename_session(session_id, name, now).await {
                Ok(_matched) => return true,
                Err(err) => self.demote("rename_session", &err),
            }
        }
        self.mem.rename_session(session_id, name, now)
    }

    // ── Message operations ───────────────────────────────────────

    /// Append one turn and bump the owning session's `updated_at`. Always
    /// reports success.
    ///
    /// The append and the touch are two independent backend calls, not one
    /// atomic unit. In the in-memory store a turn addressed to an unknown
    /// session synthesizes the session record first.
    pub async fn append_message(&self, session_id: &str, role: Role, content: &str) -> bool {
        let message = ChatMessage {
            session_id: session_id.to_owned(),
            role,
            content: content.to_owned(),
            timestamp: Utc::now(),
        };
        if let Some(pg) = self.durable() {
            match append_and_touch(pg, &message).await {
                Ok(()) => return true,
                Err(err) => self.demote("append_message", &err),
            }
        }
        let timestamp = message.timestamp;
        self.mem.append_message(message);
        self.mem.touch_session(session_id, timestamp);
        true
    }

    /// Stored turns, stripped to role + content.
    ///
    /// With a session id: that session's turns, oldest first. Without one:
    /// every turn, as one timestamp-sorted sequence in durable mode but
    /// session-by-session (sessions not cross-sorted) in degraded mode. The
    /// two modes genuinely differ here and both shapes are part of the
    /// contract.
    pub async fn get_history(&self, session_id: Option<&str>) -> Vec<HistoryEntry> {
        if let Some(pg) = self.durable() {
            let result = match session_id {
                Some(id) => pg.session_history(id).await,
                None => pg.full_history().await,
            };
            match result {
                Ok(messages) => return messages.into_iter().map(HistoryEntry::from).collect(),
                Err(err) => self.demote("get_history", &err),
            }
        }
        let messages = match session_id {
            Some(id) => self.mem.session_history(id),
            None => self.mem.full_history(),
        };
        messages.into_iter().map(HistoryEntry::from).collect()
    }

    /// Delete one session's turns and its record, or, with no id, every
    /// turn and every session. Always reports success.
    pub async fn clear_history(&self, session_id: Option<&str>) -> bool {
        if let Some(pg) = self.durable() {
            match clear_durable(pg, session_id).await {
                Ok(()) => return true,
                Err(err) => self.demote("clear_history", &err),
            }
        }
        match session_id {
            Some(id) => {
                self.mem.delete_session_messages(id);
                self.mem.delete_session(id);
            },
            None => {
                self.mem.delete_all_messages();
                self.mem.delete_all_sessions();
            },
        }
        true
    }

    // ── Teacher-persona operations ───────────────────────────────
    //
    // Failure policy differs from the chat paths on purpose: a persona write
    // that fails is shown to the user as a failure, so these log and surface
    // None/false instead of demoting. See DESIGN.md.

    /// Create a persona and return its id, or `None` when the durable
    /// backend rejects the write.
    pub async fn create_teacher(
        &self,
        name: &str,
        prompt: &str,
        is_custom: bool,
    ) -> Option<String> {
        let teacher = Teacher::new(
            Uuid::new_v4().to_string(),
            name.to_owned(),
            prompt.to_owned(),
            is_custom,
            Utc::now(),
        );
        if let Some(pg) = self.durable() {
            return match pg.insert_teacher(&teacher).await {
                Ok(()) => Some(teacher.teacher_id),
                Err(err) => {
                    tracing::error!(%err, "failed to create teacher persona");
                    None
                },
            };
        }
        let teacher_id = teacher.teacher_id.clone();
        self.mem.insert_teacher(teacher);
        Some(teacher_id)
    }

    pub async fn get_teacher(&self, teacher_id: &str) -> Option<TeacherInfo> {
        if let Some(pg) = self.durable() {
            return match pg.get_teacher(teacher_id).await {
                Ok(found) => found.as_ref().map(TeacherInfo::from),
                Err(err) => {
                    tracing::error!(%err, teacher_id, "failed to load teacher persona");
                    None
                },
            };
        }
        self.mem.get_teacher(teacher_id).as_ref().map(TeacherInfo::from)
    }

    /// All personas sorted by name ascending.
    pub async fn list_teachers(&self) -> Vec<TeacherInfo> {
        if let Some(pg) = self.durable() {
            return match pg.list_teachers().await {
                Ok(teachers) => teachers.iter().map(TeacherInfo::from).collect(),
                Err(err) => {
                    tracing::error!(%err, "failed to list teacher personas");
                    Vec::new()
                },
            };
        }
        self.mem.list_teachers().iter().map(TeacherInfo::from).collect()
    }

    /// Update a persona's prompt. `true` only if a record matched.
    pub async fn update_teacher_prompt(&self, teacher_id: &str, prompt: &str) -> bool {
        let now = Utc::now();
        if let Some(pg) = self.durable() {
            return match pg.update_teacher_prompt(teacher_id, prompt, now).await {
                Ok(matched) => matched,
                Err(err) => {
                    tracing::error!(%err, teacher_id, "failed to update teacher prompt");
                    false
                },
            };
        }
        self.mem.update_teacher_prompt(teacher_id, prompt, now)
    }

    /// Delete a custom persona. Built-in personas are never removed: the
    /// attempt is a no-op reporting `false`.
    pub async fn delete_teacher(&self, teacher_id: &str) -> bool {
        if let Some(pg) = self.durable() {
            return match pg.delete_teacher(teacher_id).await {
                Ok(deleted) => deleted,
                Err(err) => {
                    tracing::error!(%err, teacher_id, "failed to delete teacher persona");
                    false
                },
            };
        }
        self.mem.delete_teacher(teacher_id)
    }
}

fn display_name(name: Option<&str>) -> String {
    match name {
        Some(n) if !n.trim().is_empty() => n.to_owned(),
        _ => DEFAULT_SESSION_NAME.to_owned(),
    }
}

async fn append_and_touch(pg: &PgStore, message: &ChatMessage) -> Result<(), StoreError> {
    pg.append_message(message).await?;
    pg.touch_session(&message.session_id, message.timestamp).await
}

async fn clear_durable(pg: &PgStore, session_id: Option<&str>) -> Result<(), StoreError> {
    match session_id {
        Some(id) => {
            pg.delete_session_messages(id).await?;
            pg.delete_session(id).await?;
        },
        None => {
            pg.delete_all_messages().await?;
            pg.delete_all_sessions().await?;
        },
    }
    Ok(())
}
