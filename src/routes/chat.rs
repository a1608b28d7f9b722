use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "rejected chat body");
        AppError::BadRequest("Invalid JSON body".to_string())
    })?;

    let message = match payload.message {
        Some(m) if !m.trim().is_empty() => m,
        _ => return Err(AppError::BadRequest("No message provided".to_string())),
    };

    let span = tracing::info_span!(
        "chat",
        request_id = %Uuid::new_v4(),
        responder = state.responder.name(),
    );

    let reply = state
        .responder
        .respond(&message)
        .instrument(span.clone())
        .await?;

    span.in_scope(|| tracing::info!(reply_len = reply.len(), "reply relayed"));

    Ok(Json(ChatResponse { response: reply }))
}
