use axum::{
    extract::{Multipart, Path, State},
    response::Json,
};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;
use validator::Validate;

use crate::dto::coach_dto::{
    CoachMessageRequest, CoachMessageResponse, EmotionRequest, PlanRequest,
};
use crate::error::{Error, Result};
use crate::AppState;

use super::extract::ApiJson;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Wraps a backend outcome under `field`. Backend failures are logged and
/// degrade to `null` with a generic message; only bad input is an error.
fn degraded(field: &str, outcome: Result<JsonValue>, what: &str) -> Result<Json<JsonValue>> {
    let mut body = Map::new();
    match outcome {
        Ok(value) => {
            body.insert(field.to_string(), value);
        }
        Err(Error::BadRequest(msg)) => return Err(Error::BadRequest(msg)),
        Err(e) => {
            tracing::error!(error = ?e, "{} failed", what);
            body.insert(field.to_string(), JsonValue::Null);
            body.insert(
                "message".to_string(),
                JsonValue::String(GENERIC_FAILURE.to_string()),
            );
        }
    }
    Ok(Json(JsonValue::Object(body)))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CoachMessageRequest>,
) -> Result<Json<CoachMessageResponse>> {
    req.validate()?;
    let conversation_id = req.conversation_id.unwrap_or_else(Uuid::new_v4);

    let reply = state
        .coach_client
        .send_message(conversation_id, &req.message, &req.history)
        .await;

    let response = match reply {
        Ok(text) => CoachMessageResponse {
            conversation_id,
            response: Some(text),
            message: None,
        },
        Err(e) => {
            tracing::error!(error = ?e, %conversation_id, "Coach chat failed");
            CoachMessageResponse {
                conversation_id,
                response: None,
                message: Some(GENERIC_FAILURE.to_string()),
            }
        }
    };
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn analyze_emotion(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmotionRequest>,
) -> Result<Json<JsonValue>> {
    req.validate()?;
    let outcome = state.coach_client.analyze_emotion(&req.text).await;
    degraded("analysis", outcome, "Emotion analysis")
}

#[axum::debug_handler]
pub async fn generate_plan(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PlanRequest>,
) -> Result<Json<JsonValue>> {
    req.validate()?;
    let result = state.tracker.lock().await.result().cloned();
    let outcome = state
        .coach_client
        .generate_plan(result.as_ref(), &req.goals)
        .await;
    degraded("plan", outcome, "Coaching plan generation")
}

#[axum::debug_handler]
pub async fn enroll_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<JsonValue>> {
    let outcome = state.coach_client.enroll_course(&course_id).await;
    degraded("data", outcome, "Course enrollment")
}

#[axum::debug_handler]
pub async fn course_progress(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<JsonValue>> {
    let outcome = state.coach_client.course_progress(&course_id).await;
    degraded("data", outcome, "Course progress")
}

#[axum::debug_handler]
pub async fn analyze_screenshot(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<JsonValue>> {
    let mut upload: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(Error::BadRequest(format!(
                "Screenshot must be an image, got {}",
                content_type
            )));
        }
        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(Error::BadRequest("Screenshot file is empty".to_string()));
        }
        upload = Some((data.to_vec(), content_type));
    }

    let Some((image, content_type)) = upload else {
        return Err(Error::BadRequest("Missing 'file' field".to_string()));
    };

    let outcome = state
        .coach_client
        .analyze_trade_screenshot(&image, &content_type)
        .await;
    degraded("analysis", outcome, "Trade screenshot analysis")
}
