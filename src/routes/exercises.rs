use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::dto::exercise_dto::NextStepRequest;
use crate::error::Result;
use crate::models::exercise::ReflectionExercise;
use crate::services::exercise_service::ExerciseStatus;
use crate::AppState;

use super::extract::ApiJson;

pub async fn list_exercises(State(state): State<AppState>) -> Json<Vec<ReflectionExercise>> {
    Json(state.exercises.exercises().to_vec())
}

#[axum::debug_handler]
pub async fn start_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExerciseStatus>> {
    Ok(Json(state.exercises.start(&id).await?))
}

#[axum::debug_handler]
pub async fn exercise_status(State(state): State<AppState>) -> Json<Option<ExerciseStatus>> {
    Json(state.exercises.status().await)
}

#[axum::debug_handler]
pub async fn next_step(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NextStepRequest>,
) -> Result<Json<ExerciseStatus>> {
    req.validate()?;
    Ok(Json(state.exercises.next_step(req.reflection).await?))
}

#[axum::debug_handler]
pub async fn reset_exercise(State(state): State<AppState>) -> StatusCode {
    state.exercises.reset().await;
    StatusCode::NO_CONTENT
}
