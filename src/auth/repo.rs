use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Per-user UI preferences, stored as a single JSONB object. A profile
/// update that carries `preferences` replaces the whole object; missing
/// keys fall back to these defaults on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_notifications() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            notifications: default_notifications(),
        }
    }
}

/// User record in the database. The password hash is nullable so that a
/// corrupt or incomplete account is representable; sign-in refuses such
/// records instead of crashing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub age: i32,
    pub gender: String,
    pub interests: Vec<String>,
    pub avatar: Option<String>,
    pub selected_persona: String,
    pub preferences: Json<Preferences>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const USER_COLUMNS: &str = r#"id, email, name, password_hash, age, gender, interests,
       avatar, selected_persona, preferences, created_at, updated_at"#;

pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub age: i32,
    pub gender: &'a str,
    pub interests: Vec<String>,
}

/// Partial profile update. `None` fields are left untouched; a present
/// `preferences` object overwrites the stored one wholesale.
pub struct ProfilePatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub interests: Option<Vec<String>>,
    pub avatar: Option<String>,
    pub preferences: Option<Preferences>,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1
            "#,
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(db: &PgPool, new: NewUser<'_>) -> Result<User, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, age, gender, interests)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(new.email)
        .bind(new.name)
        .bind(new.password_hash)
        .bind(new.age)
        .bind(new.gender)
        .bind(new.interests)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        patch: ProfilePatch,
    ) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                interests = COALESCE($5, interests),
                avatar = COALESCE($6, avatar),
                preferences = COALESCE($7, preferences),
                updated_at = $8
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.age)
        .bind(patch.gender)
        .bind(patch.interests)
        .bind(patch.avatar)
        .bind(patch.preferences.map(Json))
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            name: "Ada".into(),
            password_hash: Some("$argon2id$secret".into()),
            age: 30,
            gender: "female".into(),
            interests: vec!["music".into()],
            avatar: None,
            selected_persona: "niko".into(),
            preferences: Json(Preferences::default()),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("a@x.com"));
    }

    #[test]
    fn preferences_defaults_fill_missing_keys() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs.theme, "dark");
        assert!(prefs.notifications);

        let prefs: Preferences = serde_json::from_str(r#"{"theme":"light"}"#).unwrap();
        assert_eq!(prefs.theme, "light");
        assert!(prefs.notifications);
    }
}
