use serde::Serialize;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::chats::dto::ChatMessage;

/// Chat document. Every query below filters by `id AND user_id` so that a
/// chat belonging to someone else is indistinguishable from one that does
/// not exist.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Chat {
    pub id: Uuid,
    pub user_id: Uuid,
    pub messages: Json<Vec<ChatMessage>>,
    pub summary: Option<String>,
    pub title: Option<String>,
    pub last_activity: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

const CHAT_COLUMNS: &str = "id, user_id, messages, summary, title, last_activity, created_at";

impl Chat {
    pub async fn find_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<Chat>, sqlx::Error> {
        let chat = sqlx::query_as::<_, Chat>(&format!(
            r#"
            SELECT {CHAT_COLUMNS}
            FROM chats
            WHERE id = $1 AND user_id = $2
            "#,
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(chat)
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Chat>, sqlx::Error> {
        let rows = sqlx::query_as::<_, Chat>(&format!(
            r#"
            SELECT {CHAT_COLUMNS}
            FROM chats
            WHERE user_id = $1
            ORDER BY last_activity DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        messages: Vec<ChatMessage>,
        summary: Option<String>,
        title: Option<String>,
    ) -> Result<Chat, sqlx::Error> {
        let chat = sqlx::query_as::<_, Chat>(&format!(
            r#"
            INSERT INTO chats (user_id, messages, summary, title, last_activity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CHAT_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(Json(messages))
        .bind(summary)
        .bind(title)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(chat)
    }

    /// Apply a partial update. `None` fields keep their stored value;
    /// `last_activity` is refreshed unconditionally.
    pub async fn update_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        messages: Option<Vec<ChatMessage>>,
        summary: Option<String>,
        title: Option<String>,
    ) -> Result<Option<Chat>, sqlx::Error> {
        let chat = sqlx::query_as::<_, Chat>(&format!(
            r#"
            UPDATE chats
            SET messages = COALESCE($3, messages),
                summary = COALESCE($4, summary),
                title = COALESCE($5, title),
                last_activity = $6
            WHERE id = $1 AND user_id = $2
            RETURNING {CHAT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(user_id)
        .bind(messages.map(Json))
        .bind(summary)
        .bind(title)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(db)
        .await?;
        Ok(chat)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM chats
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
