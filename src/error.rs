use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Unified API error type. Every handler returns this; the `IntoResponse`
/// impl is the single place errors become JSON payloads and status codes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed required input, client-fixable.
    #[error("{0}")]
    Validation(String),

    /// Duplicate unique key.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials.
    #[error("{0}")]
    Authentication(String),

    /// Corrupt stored record. Should not occur in healthy data.
    #[error("{0}")]
    Integrity(String),

    /// No valid session presented.
    #[error("{0}")]
    Unauthenticated(String),

    /// Resource absent, or exists but is not owned by the caller. The two
    /// cases are deliberately indistinguishable.
    #[error("{0}")]
    NotFound(String),

    /// Missing external-service credential. Server misconfiguration,
    /// fatal to the call.
    #[error("{0}")]
    Configuration(String),

    /// External service returned a non-success response.
    #[error("upstream service error ({status})")]
    Upstream { status: u16, detail: String },

    /// Network or parse failure reaching an external service.
    #[error("{0}")]
    Transport(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Authentication(_) | ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Integrity(_) | ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                json!({ "error": "Internal server error" })
            }
            ApiError::Integrity(msg) => {
                error!(%msg, "integrity error");
                json!({ "error": msg })
            }
            ApiError::Configuration(msg) => {
                error!(%msg, "configuration error");
                json!({ "error": msg })
            }
            // Raw upstream detail is kept in the payload for diagnostics.
            ApiError::Upstream { status, detail } => {
                error!(upstream_status = status, %detail, "upstream error");
                json!({ "error": "External service request failed", "details": detail })
            }
            ApiError::Transport(msg) => {
                error!(%msg, "transport error");
                json!({ "error": "External service unreachable" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ApiError::Conflict("Resource already exists".into())
            }
            _ => ApiError::Internal(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Authentication("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Configuration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Transport("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn upstream_error_carries_the_upstream_status() {
        let err = ApiError::Upstream {
            status: 429,
            detail: "quota exceeded".into(),
        };
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn upstream_error_with_bogus_status_falls_back_to_bad_gateway() {
        let err = ApiError::Upstream {
            status: 0,
            detail: "x".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
