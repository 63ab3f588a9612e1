use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A single message in a chat document. The timestamp is a display string
/// produced by the client, stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    #[serde(rename = "type")]
    pub sender: Sender,
    pub timestamp: String,
}

/// Request body for `PUT /chats/{id}`. Only present fields are applied;
/// omission never clears a field.
#[derive(Debug, Deserialize)]
pub struct UpdateChatRequest {
    pub messages: Option<Vec<ChatMessage>>,
    pub summary: Option<String>,
    pub title: Option<String>,
}

/// Request body for `POST /chats`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub summary: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteChatResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_uses_the_wire_field_names() {
        let msg = ChatMessage {
            id: Uuid::new_v4(),
            text: "hi".into(),
            sender: Sender::Ai,
            timestamp: "02:30 PM".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "ai");
        assert_eq!(json["timestamp"], "02:30 PM");

        let back: ChatMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back.sender, Sender::Ai);
    }

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);
    }
}
