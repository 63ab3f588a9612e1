use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub reply: String,
}
