use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{split_interests, AuthRequest, AuthResponse, PublicUser},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{NewUser, User},
    },
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth", post(authenticate))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Single entry point for sign-up and sign-in, switched by `is_sign_up`.
#[instrument(skip(state, payload))]
pub async fn authenticate(
    State(state): State<AppState>,
    Json(mut payload): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".into(),
        ));
    }

    let user = if payload.is_sign_up {
        sign_up(&state, &payload).await?
    } else {
        sign_in(&state, &payload).await?
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    Ok(Json(AuthResponse {
        token,
        user: PublicUser {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    }))
}

async fn sign_up(state: &AppState, payload: &AuthRequest) -> Result<User, ApiError> {
    let (name, age, gender) = match (&payload.name, payload.age, payload.gender) {
        (Some(name), Some(age), Some(gender)) if !name.trim().is_empty() => (name, age, gender),
        _ => {
            warn!(email = %payload.email, "signup with missing profile fields");
            return Err(ApiError::Validation(
                "All fields are required for signup".into(),
            ));
        }
    };

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if age < 18 {
        warn!(email = %payload.email, "signup under age limit");
        return Err(ApiError::Validation(
            "You must be at least 18 years old".into(),
        ));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&payload.password)?;
    let interests = split_interests(payload.interests.as_deref());

    let user = User::create(
        &state.db,
        NewUser {
            email: &payload.email,
            name,
            password_hash: &hash,
            age,
            gender: gender.as_str(),
            interests,
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(user)
}

async fn sign_in(state: &AppState, payload: &AuthRequest) -> Result<User, ApiError> {
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "sign-in unknown email");
            return Err(ApiError::NotFound("No user found".into()));
        }
    };

    // A record without a hash signals a previously corrupt or incomplete
    // account; refuse rather than guess.
    let hash = user.password_hash.as_deref().ok_or_else(|| {
        ApiError::Integrity("Please sign up again - account needs password setup".into())
    })?;

    if !verify_password(&payload.password, hash)? {
        warn!(email = %payload.email, user_id = %user.id, "sign-in invalid password");
        return Err(ApiError::Authentication("Invalid password".into()));
    }

    info!(user_id = %user.id, email = %user.email, "user signed in");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::dto::Gender;

    fn signup_request(email: &str, password: &str) -> AuthRequest {
        AuthRequest {
            email: email.into(),
            password: password.into(),
            name: Some("Ada".into()),
            age: Some(30),
            gender: Some(Gender::Female),
            interests: None,
            is_sign_up: true,
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a @x.com"));
    }

    // The validation ladder runs before any database access, so these use
    // the fake state with a lazily connecting pool that is never touched.

    #[tokio::test]
    async fn empty_credentials_are_rejected() {
        let state = AppState::fake();
        let mut req = signup_request("a@x.com", "p");
        req.password = String::new();
        let err = authenticate(State(state), Json(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn signup_missing_age_is_a_validation_error() {
        let state = AppState::fake();
        let mut req = signup_request("a@x.com", "p");
        req.age = None;
        let err = authenticate(State(state), Json(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn signup_under_18_is_a_validation_error() {
        let state = AppState::fake();
        let mut req = signup_request("a@x.com", "p");
        req.age = Some(17);
        let err = authenticate(State(state), Json(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn signup_with_bad_email_is_a_validation_error() {
        let state = AppState::fake();
        let err = authenticate(State(state), Json(signup_request("nope", "p")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
