//! Chat flow: store the user turn, ask the LLM, store the reply.

use std::sync::Arc;

use axum::{Json, extract::State};
use sahpaathi_core::{LLM_NOT_CONFIGURED, Role};

use crate::api_error::ApiError;
use crate::api_types::{ChatRequest, ChatResponse, TestLlmResponse};
use crate::AppState;

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("No prompt provided".to_owned()));
    }
    let Some(llm) = state.llm.as_ref() else {
        return Err(ApiError::ServiceUnavailable(LLM_NOT_CONFIGURED.to_owned()));
    };

    let session_id = match req.session_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => state.store.create_session(None).await,
    };

    // The persona's prompt steers the reply; an unknown teacher_id falls
    // back to the default instruction rather than failing the chat.
    let instruction = match req.teacher_id.as_deref() {
        Some(teacher_id) => match state.store.get_teacher(teacher_id).await {
            Some(teacher) => teacher.prompt,
            None => {
                tracing::warn!(teacher_id, "unknown teacher persona, using default instruction");
                state.instruction.clone()
            },
        },
        None => state.instruction.clone(),
    };

    // Prior turns are read before the new prompt is stored so the prompt
    // appears exactly once in the LLM request.
    let history = state.store.get_history(Some(&session_id)).await;

    state.store.append_message(&session_id, Role::User, prompt).await;

    // The user turn stays stored even when the LLM fails; the failure is
    // surfaced and the student can retry without losing their question.
    let reply = llm.generate_reply(&instruction, &history, prompt).await?;

    state.store.append_message(&session_id, Role::Assistant, &reply).await;

    Ok(Json(ChatResponse { response: reply, session_id }))
}

pub async fn test_llm(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TestLlmResponse>, ApiError> {
    let Some(llm) = state.llm.as_ref() else {
        return Err(ApiError::ServiceUnavailable(LLM_NOT_CONFIGURED.to_owned()));
    };
    let response = llm.probe().await?;
    Ok(Json(TestLlmResponse { status: "LLM API test", response, api_key_valid: true }))
}
