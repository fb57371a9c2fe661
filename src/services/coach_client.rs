use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use url::Url;
use uuid::Uuid;

use crate::dto::coach_dto::ChatTurn;
use crate::error::{Error, Result};
use crate::models::response::AssessmentResponse;
use crate::services::scoring_service::AssessmentResult;

/// Client for the coaching backend. Every endpoint takes JSON and answers
/// with a JSON object whose payload sits under one known top-level field.
#[derive(Clone)]
pub struct CoachClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl CoachClient {
    pub fn new(mut base_url: Url, api_key: Option<String>, client: Client) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub async fn submit_analysis(
        &self,
        result: &AssessmentResult,
        responses: &[AssessmentResponse],
    ) -> Result<JsonValue> {
        let body = json!({
            "result": result,
            "responses": responses,
        });
        self.post_for_field("assessment/analyze", &body, "analysis")
            .await
    }

    pub async fn send_message(
        &self,
        conversation_id: Uuid,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String> {
        let body = json!({
            "conversation_id": conversation_id,
            "message": message,
            "history": history,
        });
        let reply = self.post_for_field("coach/chat", &body, "response").await?;
        match reply {
            JsonValue::String(text) => Ok(text),
            other => Err(Error::Upstream(format!(
                "Coach reply is not text: {}",
                other
            ))),
        }
    }

    pub async fn analyze_emotion(&self, text: &str) -> Result<JsonValue> {
        self.post_for_field("coach/emotion", &json!({ "text": text }), "analysis")
            .await
    }

    pub async fn generate_plan(
        &self,
        result: Option<&AssessmentResult>,
        goals: &[String],
    ) -> Result<JsonValue> {
        let body = json!({
            "assessment": result,
            "goals": goals,
        });
        self.post_for_field("coach/plan", &body, "plan").await
    }

    pub async fn enroll_course(&self, course_id: &str) -> Result<JsonValue> {
        let path = format!("courses/{}/enroll", path_segment(course_id)?);
        self.post_for_field(&path, &json!({}), "data").await
    }

    pub async fn course_progress(&self, course_id: &str) -> Result<JsonValue> {
        let path = format!("courses/{}/progress", path_segment(course_id)?);
        let url = self.endpoint(&path)?;
        let mut req = self.client.get(url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let body: JsonValue = req.send().await?.error_for_status()?.json().await?;
        take_field(body, "data")
    }

    pub async fn analyze_trade_screenshot(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<JsonValue> {
        let body = json!({
            "image": BASE64.encode(image),
            "content_type": content_type,
        });
        self.post_for_field("trades/analyze-screenshot", &body, "analysis")
            .await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Internal(format!("Invalid coach endpoint '{}': {}", path, e)))
    }

    async fn post_for_field(&self, path: &str, body: &JsonValue, field: &str) -> Result<JsonValue> {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url.as_str(), "Calling coaching backend");

        let mut req = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await?.error_for_status()?;
        let reply: JsonValue = resp.json().await?;
        take_field(reply, field)
    }
}

fn take_field(mut reply: JsonValue, field: &str) -> Result<JsonValue> {
    match reply.get_mut(field).map(JsonValue::take) {
        Some(JsonValue::Null) | None => Err(Error::Upstream(format!(
            "Coaching backend response is missing '{}'",
            field
        ))),
        Some(value) => Ok(value),
    }
}

fn path_segment(id: &str) -> Result<&str> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        Err(Error::BadRequest(format!("Invalid course id '{}'", id)))
    }
}
