//! In-memory degraded backend.
//!
//! Plain process-local maps. One `Mutex` guards all three, taken exactly once
//! per operation: each operation is internally consistent, but there is no
//! atomicity across operations (matching the durable backend, where e.g.
//! appending a turn and touching its session are two independent calls).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sahpaathi_core::{ChatMessage, DEFAULT_SESSION_NAME, Session, Teacher};

use crate::error::StoreError;
use crate::traits::{MessageStore, SessionStore, TeacherStore};

#[derive(Debug, Default)]
struct MemState {
    sessions: HashMap<String, Session>,
    messages: HashMap<String, Vec<ChatMessage>>,
    teachers: HashMap<String, Teacher>,
}

/// Process-local mapping store used while degraded.
#[derive(Debug, Default)]
pub struct MemStore {
    state: Mutex<MemState>,
}

impl MemStore {
    /// A poisoned lock only means another request panicked mid-operation;
    /// the maps themselves are still structurally sound.
    fn lock(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_session(&self, session: Session) {
        self.lock().sessions.insert(session.session_id.clone(), session);
    }

    pub fn list_sessions(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.lock().sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions
    }

    pub fn rename_session(&self, session_id: &str, name: &str, now: DateTime<Utc>) -> bool {
        match self.lock().sessions.get_mut(session_id) {
            Some(session) => {
                session.name = name.to_owned();
                session.updated_at = now;
                true
            },
            None => false,
        }
    }

    pub fn touch_session(&self, session_id: &str, now: DateTime<Utc>) {
        if let Some(session) = self.lock().sessions.get_mut(session_id) {
            session.updated_at = now;
        }
    }

    pub fn delete_session(&self, session_id: &str) -> bool {
        self.lock().sessions.remove(session_id).is_some()
    }

    pub fn delete_all_sessions(&self) {
        self.lock().sessions.clear();
    }

    /// Append one turn. A turn addressed to an unknown session synthesizes
    /// the session record first, with the default name and the turn's
    /// timestamp. Lazy session creation for callers that never called
    /// `create_session`.
    pub fn append_message(&self, message: ChatMessage) {
        let mut state = self.lock();
        state.sessions.entry(message.session_id.clone()).or_insert_with(|| {
            Session::new(
                message.session_id.clone(),
                DEFAULT_SESSION_NAME.to_owned(),
                message.timestamp,
            )
        });
        state.messages.entry(message.session_id.clone()).or_default().push(message);
    }

    pub fn session_history(&self, session_id: &str) -> Vec<ChatMessage> {
        let mut messages =
            self.lock().messages.get(session_id).cloned().unwrap_or_default();
        // Appended in call order already; the sort is stable, so equal
        // timestamps keep that order.
        messages.sort_by_key(|m| m.timestamp);
        messages
    }

    /// Every turn, session by session. Each session's turns are contiguous
    /// and internally ordered; sessions themselves are not cross-sorted.
    pub fn full_history(&self) -> Vec<ChatMessage> {
        let state = self.lock();
        let mut all = Vec::new();
        for messages in state.messages.values() {
            let mut chunk = messages.clone();
            chunk.sort_by_key(|m| m.timestamp);
            all.extend(chunk);
        }
        all
    }

    pub fn delete_session_messages(&self, session_id: &str) {
        self.lock().messages.remove(session_id);
    }

    pub fn delete_all_messages(&self) {
        self.lock().messages.clear();
    }

    pub fn insert_teacher(&self, teacher: Teacher) {
        self.lock().teachers.insert(teacher.teacher_id.clone(), teacher);
    }

    pub fn get_teacher(&self, teacher_id: &str) -> Option<Teacher> {
        self.lock().teachers.get(teacher_id).cloned()
    }

    pub fn list_teachers(&self) -> Vec<Teacher> {
        let mut teachers: Vec<Teacher> = self.lock().teachers.values().cloned().collect();
        teachers.sort_by(|a, b| a.name.cmp(&b.name));
        teachers
    }

    pub fn update_teacher_prompt(
        &self,
        teacher_id: &str,
        prompt: &str,
        now: DateTime<Utc>,
    ) -> bool {
        match self.lock().teachers.get_mut(teacher_id) {
            Some(teacher) => {
                teacher.prompt = prompt.to_owned();
                teacher.updated_at = now;
                true
            },
            None => false,
        }
    }

    /// Only custom personas are deletable; a built-in stays and reports
    /// `false`.
    pub fn delete_teacher(&self, teacher_id: &str) -> bool {
        let mut state = self.lock();
        match state.teachers.get(teacher_id) {
            Some(teacher) if teacher.is_custom => {
                state.teachers.remove(teacher_id);
                true
            },
            _ => false,
        }
    }
}

// Trait impls delegate to the inherent methods so generic code (and the
// shared backend test suite) can treat MemStore and PgStore uniformly.

#[async_trait]
impl SessionStore for MemStore {
    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        self.insert_session(session.clone());
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, StoreError> {
        Ok(self.list_sessions())
    }

    async fn rename_session(
        &self,
        session_id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        Ok(self.rename_session(session_id, name, now))
    }

    async fn touch_session(&self, session_id: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.touch_session(session_id, now);
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<bool, StoreError> {
        Ok(self.delete_session(session_id))
    }

    async fn delete_all_sessions(&self) -> Result<(), StoreError> {
        self.delete_all_sessions();
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemStore {
    async fn append_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        self.append_message(message.clone());
        Ok(())
    }

    async fn session_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(self.session_history(session_id))
    }

    async fn full_history(&self) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(self.full_history())
    }

    async fn delete_session_messages(&self, session_id: &str) -> Result<(), StoreError> {
        self.delete_session_messages(session_id);
        Ok(())
    }

    async fn delete_all_messages(&self) -> Result<(), StoreError> {
        self.delete_all_messages();
        Ok(())
    }
}

#[async_trait]
impl TeacherStore for MemStore {
    async fn insert_teacher(&self, teacher: &Teacher) -> Result<(), StoreError> {
        self.insert_teacher(teacher.clone());
        Ok(())
    }

    async fn get_teacher(&self, teacher_id: &str) -> Result<Option<Teacher>, StoreError> {
        Ok(self.get_teacher(teacher_id))
    }

    async fn list_teachers(&self) -> Result<Vec<Teacher>, StoreError> {
        Ok(self.list_teachers())
    }

    async fn update_teacher_prompt(
        &self,
        teacher_id: &str,
        prompt: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        Ok(self.update_teacher_prompt(teacher_id, prompt, now))
    }

    async fn delete_teacher(&self, teacher_id: &str) -> Result<bool, StoreError> {
        Ok(self.delete_teacher(teacher_id))
    }
}
