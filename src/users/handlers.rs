use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::{
        jwt::AuthUser,
        repo::{ProfilePatch, User},
    },
    error::ApiError,
    state::AppState,
    users::dto::{normalize_interests, UpdateProfileRequest},
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/user", get(get_profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let patch = ProfilePatch {
        name: payload.name,
        age: payload.age,
        gender: payload.gender.map(|g| g.as_str().to_string()),
        interests: payload.interests.map(normalize_interests),
        avatar: payload.avatar,
        preferences: payload.preferences,
    };

    let user = User::update_profile(&state.db, user_id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(user))
}
