//! Request and response DTOs for the JSON API.

use sahpaathi_core::{HistoryEntry, SessionInfo, TeacherInfo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct TestLlmResponse {
    pub status: &'static str,
    pub response: String,
    pub api_key_valid: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionInfo>,
}

#[derive(Debug, Deserialize)]
pub struct RenameSessionRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeacherRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct CreateTeacherResponse {
    pub teacher_id: String,
}

#[derive(Debug, Serialize)]
pub struct TeachersResponse {
    pub teachers: Vec<TeacherInfo>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTeacherPromptRequest {
    #[serde(default)]
    pub prompt: String,
}
