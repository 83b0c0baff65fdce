//! Teacher-persona routes.
//!
//! Unlike the chat routes, persistence failures here are user-visible: the
//! persona UI shows them instead of silently switching substrates.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use sahpaathi_core::TeacherInfo;

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::{
    CreateTeacherRequest, CreateTeacherResponse, SuccessResponse, TeachersResponse,
    UpdateTeacherPromptRequest,
};

pub async fn create_teacher(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTeacherRequest>,
) -> Result<Json<CreateTeacherResponse>, ApiError> {
    let name = req.name.trim();
    let prompt = req.prompt.trim();
    if name.is_empty() || prompt.is_empty() {
        return Err(ApiError::BadRequest("Name and prompt are required".to_owned()));
    }

    match state.store.create_teacher(name, prompt, true).await {
        Some(teacher_id) => Ok(Json(CreateTeacherResponse { teacher_id })),
        None => Err(ApiError::ServiceUnavailable("Failed to create teacher".to_owned())),
    }
}

pub async fn list_teachers(State(state): State<Arc<AppState>>) -> Json<TeachersResponse> {
    Json(TeachersResponse { teachers: state.store.list_teachers().await })
}

pub async fn get_teacher(
    State(state): State<Arc<AppState>>,
    Path(teacher_id): Path<String>,
) -> Result<Json<TeacherInfo>, ApiError> {
    match state.store.get_teacher(&teacher_id).await {
        Some(teacher) => Ok(Json(teacher)),
        None => Err(ApiError::NotFound(format!("teacher '{teacher_id}' not found"))),
    }
}

pub async fn update_teacher_prompt(
    State(state): State<Arc<AppState>>,
    Path(teacher_id): Path<String>,
    Json(req): Json<UpdateTeacherPromptRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if req.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("No prompt provided".to_owned()));
    }
    let success = state.store.update_teacher_prompt(&teacher_id, &req.prompt).await;
    Ok(Json(SuccessResponse { success }))
}

/// Re-checks `is_custom` before delegating, so a built-in persona is refused
/// here even though the store enforces the same rule.
pub async fn delete_teacher(
    State(state): State<Arc<AppState>>,
    Path(teacher_id): Path<String>,
) -> Json<SuccessResponse> {
    if let Some(teacher) = state.store.get_teacher(&teacher_id).await {
        if !teacher.is_custom {
            return Json(SuccessResponse { success: false });
        }
    }
    let success = state.store.delete_teacher(&teacher_id).await;
    Json(SuccessResponse { success })
}
