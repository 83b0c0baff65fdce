//! Session and history routes.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::{
    ClearRequest, CreateSessionRequest, CreateSessionResponse, HistoryQuery, HistoryResponse,
    RenameSessionRequest, SessionsResponse, SuccessResponse,
};

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Json<CreateSessionResponse> {
    let session_id = state.store.create_session(req.name.as_deref()).await;
    Json(CreateSessionResponse { session_id })
}

pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<SessionsResponse> {
    Json(SessionsResponse { sessions: state.store.list_sessions().await })
}

pub async fn rename_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<RenameSessionRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("No name provided".to_owned()));
    }
    let success = state.store.rename_session(&session_id, &req.name).await;
    Ok(Json(SuccessResponse { success }))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let history = state.store.get_history(query.session_id.as_deref()).await;
    Json(HistoryResponse { history })
}

pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClearRequest>,
) -> Json<SuccessResponse> {
    let success = state.store.clear_history(req.session_id.as_deref()).await;
    Json(SuccessResponse { success })
}
