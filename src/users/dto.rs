use serde::Deserialize;

use crate::auth::{dto::Gender, repo::Preferences};

/// Request body for `PUT /user`. Provided fields overwrite the stored
/// values wholesale; absent fields are left untouched. In particular a
/// provided `preferences` object replaces the whole stored object rather
/// than merging into it.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub interests: Option<Vec<String>>,
    pub avatar: Option<String>,
    pub preferences: Option<Preferences>,
}

/// Trim each interest and drop empty segments. The sign-up path keeps
/// empty segments; this path does not.
pub fn normalize_interests(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect()
}
