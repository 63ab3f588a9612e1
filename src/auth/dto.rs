use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// Request body for `POST /auth`. A single endpoint covers sign-up and
/// sign-in, switched by `is_sign_up`; the profile fields are only required
/// on the sign-up path.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    /// Comma-joined interests string, e.g. "music, travel".
    pub interests: Option<String>,
    #[serde(default, alias = "isSignUp")]
    pub is_sign_up: bool,
}

/// Response returned after a successful sign-up or sign-in.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Identity returned to the client. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// Split a comma-joined interests string into trimmed segments. Empty
/// segments are kept here; the profile-update path filters them.
pub fn split_interests(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.is_empty() => s.split(',').map(|i| i.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_interests_trims_segments() {
        assert_eq!(
            split_interests(Some("music, travel ,reading")),
            vec!["music", "travel", "reading"]
        );
    }

    #[test]
    fn split_interests_keeps_empty_segments() {
        assert_eq!(split_interests(Some("music,,travel")), vec!["music", "", "travel"]);
    }

    #[test]
    fn split_interests_defaults_to_empty() {
        assert!(split_interests(None).is_empty());
        assert!(split_interests(Some("")).is_empty());
    }

    #[test]
    fn gender_deserializes_lowercase() {
        let g: Gender = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(g, Gender::Female);
        assert!(serde_json::from_str::<Gender>("\"unknown\"").is_err());
    }

    #[test]
    fn auth_request_accepts_camel_case_flag() {
        let req: AuthRequest =
            serde_json::from_str(r#"{"email":"a@x.com","password":"p","isSignUp":true}"#).unwrap();
        assert!(req.is_sign_up);

        let req: AuthRequest =
            serde_json::from_str(r#"{"email":"a@x.com","password":"p"}"#).unwrap();
        assert!(!req.is_sign_up);
    }
}
