use axum::{extract::State, http::header, response::IntoResponse, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    companion::dto::{ReplyResponse, SpeakRequest},
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companion/reply", post(companion_reply))
        .route("/companion/speech", post(companion_speech))
}

/// Validation happens before the client is touched, so an empty request
/// never produces an external call.
fn require_text(payload: &SpeakRequest) -> Result<&str, ApiError> {
    match payload.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ApiError::Validation("Text is required".into())),
    }
}

#[instrument(skip(state, payload))]
pub async fn companion_reply(
    State(state): State<AppState>,
    Json(payload): Json<SpeakRequest>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let text = require_text(&payload)?;
    let reply = state.companion.generate_reply(text).await?;
    Ok(Json(ReplyResponse { reply }))
}

#[instrument(skip(state, payload))]
pub async fn companion_speech(
    State(state): State<AppState>,
    Json(payload): Json<SpeakRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = require_text(&payload)?;
    let audio = state.companion.synthesize_speech(text).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (
                header::CONTENT_DISPOSITION,
                "inline; filename=\"speech.mp3\"",
            ),
        ],
        audio,
    ))
}
