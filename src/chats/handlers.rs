use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    chats::{
        dto::{CreateChatRequest, DeleteChatResponse, Pagination, UpdateChatRequest},
        repo::Chat,
    },
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/chats", get(list_chats).post(create_chat))
        .route(
            "/chats/:id",
            get(get_chat).put(update_chat).delete(delete_chat),
        )
}

#[instrument(skip(state))]
pub async fn list_chats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Chat>>, ApiError> {
    let chats = Chat::list_by_user(&state.db, user_id, p.limit, p.offset).await?;
    Ok(Json(chats))
}

#[instrument(skip(state, payload))]
pub async fn create_chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<Chat>), ApiError> {
    let chat = Chat::insert(
        &state.db,
        user_id,
        payload.messages,
        payload.summary,
        payload.title,
    )
    .await?;
    info!(chat_id = %chat.id, user_id = %user_id, "chat created");
    Ok((StatusCode::CREATED, Json(chat)))
}

#[instrument(skip(state))]
pub async fn get_chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Chat>, ApiError> {
    let chat = Chat::find_owned(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chat not found".into()))?;
    Ok(Json(chat))
}

#[instrument(skip(state, payload))]
pub async fn update_chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateChatRequest>,
) -> Result<Json<Chat>, ApiError> {
    let chat = Chat::update_owned(
        &state.db,
        user_id,
        id,
        payload.messages,
        payload.summary,
        payload.title,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Chat not found".into()))?;
    Ok(Json(chat))
}

#[instrument(skip(state))]
pub async fn delete_chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteChatResponse>, ApiError> {
    let deleted = Chat::delete_owned(&state.db, user_id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Chat not found".into()));
    }
    info!(chat_id = %id, user_id = %user_id, "chat deleted");
    Ok(Json(DeleteChatResponse {
        message: "Chat deleted successfully",
    }))
}
