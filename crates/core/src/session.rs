use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, timestamped container for one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// A freshly created session: `created_at == updated_at`.
    #[must_use]
    pub fn new(session_id: String, name: String, now: DateTime<Utc>) -> Self {
        Self { session_id, name, created_at: now, updated_at: now }
    }
}

/// Wire shape of a session: timestamps normalized to RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.session_id.clone(),
            name: session.name.clone(),
            created_at: session.created_at.to_rfc3339(),
            updated_at: session.updated_at.to_rfc3339(),
        }
    }
}

/// Who produced a conversational turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Error for parsing a [`Role`] from its stored text form.
#[derive(Debug, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct InvalidRole(pub String);

impl std::str::FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(InvalidRole(s.to_owned())),
        }
    }
}

/// One conversational turn. Append-only: never edited after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub session_id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Caller-facing shape of a stored turn: role and content only.
///
/// `session_id` and `timestamp` are storage details and are stripped before
/// history leaves the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl From<ChatMessage> for HistoryEntry {
    fn from(msg: ChatMessage) -> Self {
        Self { role: msg.role, content: msg.content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("assistant".parse::<Role>().unwrap(), Role::Assistant);
        assert_eq!(Role::User.as_str(), "user");
        assert!("system".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        let parsed: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, Role::User);
    }

    #[test]
    fn test_session_info_rfc3339() {
        let now = Utc::now();
        let session = Session::new("s-1".to_owned(), "Algebra".to_owned(), now);
        let info = SessionInfo::from(&session);
        assert_eq!(info.created_at, now.to_rfc3339());
        assert_eq!(info.created_at, info.updated_at);
    }

    #[test]
    fn test_history_entry_strips_storage_fields() {
        let msg = ChatMessage {
            session_id: "s-1".to_owned(),
            role: Role::User,
            content: "what is x?".to_owned(),
            timestamp: Utc::now(),
        };
        let entry = HistoryEntry::from(msg);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "what is x?"}));
    }
}
