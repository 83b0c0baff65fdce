//! PostgreSQL durable backend using sqlx.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sahpaathi_core::{
    ChatMessage, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
    Role, Session, Teacher, builtin_teachers,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::StoreError;
use crate::traits::{MessageStore, SessionStore, TeacherStore};

pub(crate) const SESSION_COLUMNS: &str = "session_id, name, created_at, updated_at";
pub(crate) const MESSAGE_COLUMNS: &str = "session_id, role, content, timestamp";
pub(crate) const TEACHER_COLUMNS: &str =
    "teacher_id, name, prompt, is_custom, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect, bootstrap the schema, and seed built-in personas.
    ///
    /// The pool's acquire timeout doubles as the startup reachability probe:
    /// an unreachable server fails here within that window instead of
    /// hanging.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_migrations(&pool).await?;
        seed_builtin_teachers(&pool).await?;
        tracing::info!("PgStore initialized");
        Ok(Self { pool })
    }
}

/// Idempotent schema bootstrap.
async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS sessions (
            session_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_sessions_updated ON sessions (updated_at DESC)",
        "CREATE TABLE IF NOT EXISTS messages (
            session_id TEXT NOT NULL,
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            timestamp TIMESTAMPTZ NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_messages_session ON messages (session_id, timestamp)",
        "CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages (timestamp)",
        "CREATE TABLE IF NOT EXISTS teachers (
            teacher_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            prompt TEXT NOT NULL,
            is_custom BOOLEAN NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_teachers_name ON teachers (name)",
    ];
    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;
    }
    Ok(())
}

/// Insert the three built-in personas, once, only into an empty collection.
/// Re-running against a populated table is a no-op, so restarts never
/// duplicate or resurrect them.
async fn seed_builtin_teachers(pool: &PgPool) -> Result<(), StoreError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teachers")
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::Seed(e.to_string()))?;
    if count > 0 {
        return Ok(());
    }
    let ids = [
        uuid::Uuid::new_v4().to_string(),
        uuid::Uuid::new_v4().to_string(),
        uuid::Uuid::new_v4().to_string(),
    ];
    for teacher in builtin_teachers(ids, Utc::now()) {
        insert_teacher_row(pool, &teacher).await.map_err(|e| StoreError::Seed(e.to_string()))?;
    }
    tracing::info!("seeded built-in teacher personas");
    Ok(())
}

async fn insert_teacher_row(pool: &PgPool, teacher: &Teacher) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("INSERT INTO teachers ({TEACHER_COLUMNS}) VALUES ($1,$2,$3,$4,$5,$6)"))
        .bind(&teacher.teacher_id)
        .bind(&teacher.name)
        .bind(&teacher.prompt)
        .bind(teacher.is_custom)
        .bind(teacher.created_at)
        .bind(teacher.updated_at)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) fn row_to_session(row: &sqlx::postgres::PgRow) -> Result<Session, StoreError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(Session {
        session_id: row.try_get("session_id")?,
        name: row.try_get("name")?,
        created_at,
        updated_at,
    })
}

pub(crate) fn row_to_message(row: &sqlx::postgres::PgRow) -> Result<ChatMessage, StoreError> {
    let role_str: String = row.try_get("role")?;
    let role: Role = role_str.parse().unwrap_or_else(|_| {
        tracing::warn!(invalid_role = %role_str, "corrupt role in DB, defaulting to user");
        Role::User
    });
    let timestamp: DateTime<Utc> = row.try_get("timestamp")?;
    Ok(ChatMessage {
        session_id: row.try_get("session_id")?,
        role,
        content: row.try_get("content")?,
        timestamp,
    })
}

pub(crate) fn row_to_teacher(row: &sqlx::postgres::PgRow) -> Result<Teacher, StoreError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(Teacher {
        teacher_id: row.try_get("teacher_id")?,
        name: row.try_get("name")?,
        prompt: row.try_get("prompt")?,
        is_custom: row.try_get("is_custom")?,
        created_at,
        updated_at,
    })
}

// ── SessionStore ─────────────────────────────────────────────────

#[async_trait]
impl SessionStore for PgStore {
    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(&format!("INSERT INTO sessions ({SESSION_COLUMNS}) VALUES ($1,$2,$3,$4)"))
            .bind(&session.session_id)
            .bind(&session.name)
            .bind(session.created_at)
            .bind(session.updated_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY updated_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_session).collect()
    }

    async fn rename_session(
        &self,
        session_id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE sessions SET name = $1, updated_at = $2 WHERE session_id = $3")
            .bind(name)
            .bind(now)
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn touch_session(&self, session_id: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("UPDATE sessions SET updated_at = $1 WHERE session_id = $2")
            .bind(now)
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_sessions(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions").execute(&self.pool).await?;
        Ok(())
    }
}

// ── MessageStore ─────────────────────────────────────────────────

#[async_trait]
impl MessageStore for PgStore {
    async fn append_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        sqlx::query(&format!("INSERT INTO messages ({MESSAGE_COLUMNS}) VALUES ($1,$2,$3,$4)"))
            .bind(&message.session_id)
            .bind(message.role.as_str())
            .bind(&message.content)
            .bind(message.timestamp)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn session_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE session_id = $1 ORDER BY timestamp ASC"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_message).collect()
    }

    async fn full_history(&self) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY timestamp ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_message).collect()
    }

    async fn delete_session_messages(&self, session_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM messages WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_all_messages(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM messages").execute(&self.pool).await?;
        Ok(())
    }
}

// ── TeacherStore ─────────────────────────────────────────────────

#[async_trait]
impl TeacherStore for PgStore {
    async fn insert_teacher(&self, teacher: &Teacher) -> Result<(), StoreError> {
        insert_teacher_row(&self.pool, teacher).await?;
        Ok(())
    }

    async fn get_teacher(&self, teacher_id: &str) -> Result<Option<Teacher>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE teacher_id = $1"
        ))
        .bind(teacher_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_teacher).transpose()
    }

    async fn list_teachers(&self) -> Result<Vec<Teacher>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {TEACHER_COLUMNS} FROM teachers ORDER BY name ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_teacher).collect()
    }

    async fn update_teacher_prompt(
        &self,
        teacher_id: &str,
        prompt: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE teachers SET prompt = $1, updated_at = $2 WHERE teacher_id = $3")
                .bind(prompt)
                .bind(now)
                .bind(teacher_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_teacher(&self, teacher_id: &str) -> Result<bool, StoreError> {
        let result =
            sqlx::query("DELETE FROM teachers WHERE teacher_id = $1 AND is_custom")
                .bind(teacher_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
