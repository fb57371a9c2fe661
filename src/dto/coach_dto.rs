use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Coach,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CoachMessageRequest {
    pub conversation_id: Option<Uuid>,
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachMessageResponse {
    pub conversation_id: Uuid,
    pub response: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmotionRequest {
    #[validate(length(min = 1, max = 4000))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlanRequest {
    #[serde(default)]
    #[validate(length(max = 10))]
    pub goals: Vec<String>,
}
