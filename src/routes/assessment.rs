use axum::{extract::State, response::Json};
use validator::Validate;

use crate::dto::assessment_dto::{
    AnswerRequest, AnswerResponse, AssessmentStatusResponse, QuestionResponse, ReorderRequest,
    ReorderResponse, ResultsResponse,
};
use crate::error::Result;
use crate::AppState;

use super::extract::ApiJson;

#[axum::debug_handler]
pub async fn get_status(State(state): State<AppState>) -> Json<AssessmentStatusResponse> {
    let tracker = state.tracker.lock().await;
    Json(AssessmentStatusResponse::from_tracker(&tracker))
}

#[axum::debug_handler]
pub async fn start(State(state): State<AppState>) -> Result<Json<AssessmentStatusResponse>> {
    let mut tracker = state.tracker.lock().await;
    tracker.start().await?;
    Ok(Json(AssessmentStatusResponse::from_tracker(&tracker)))
}

#[axum::debug_handler]
pub async fn pause(State(state): State<AppState>) -> Result<Json<AssessmentStatusResponse>> {
    let mut tracker = state.tracker.lock().await;
    tracker.pause().await?;
    Ok(Json(AssessmentStatusResponse::from_tracker(&tracker)))
}

#[axum::debug_handler]
pub async fn resume(State(state): State<AppState>) -> Result<Json<AssessmentStatusResponse>> {
    let mut tracker = state.tracker.lock().await;
    tracker.resume().await?;
    Ok(Json(AssessmentStatusResponse::from_tracker(&tracker)))
}

#[axum::debug_handler]
pub async fn restart(State(state): State<AppState>) -> Json<AssessmentStatusResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.restart().await;
    Json(AssessmentStatusResponse::from_tracker(&tracker))
}

#[axum::debug_handler]
pub async fn current_question(State(state): State<AppState>) -> Result<Json<QuestionResponse>> {
    let mut tracker = state.tracker.lock().await;
    let question = tracker.current_question().await?;
    Ok(Json(QuestionResponse {
        index: tracker.progress().current_question_index,
        total: tracker.bank().len(),
        question,
    }))
}

#[axum::debug_handler]
pub async fn select_answer(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AnswerRequest>,
) -> Result<Json<AssessmentStatusResponse>> {
    let mut tracker = state.tracker.lock().await;
    tracker.select_answer(req.answer).await?;
    Ok(Json(AssessmentStatusResponse::from_tracker(&tracker)))
}

#[axum::debug_handler]
pub async fn answer(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    let mut tracker = state.tracker.lock().await;
    tracker.answer_question(req.answer).await?;
    let progress = tracker.progress();
    Ok(Json(AnswerResponse {
        phase: tracker.phase(),
        current_question_index: progress.current_question_index,
        current_category: progress.current_category,
        completed_categories: progress.completed_categories.clone(),
        coaching_message: tracker.coaching_message(),
    }))
}

#[axum::debug_handler]
pub async fn reorder_ranking(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ReorderRequest>,
) -> Result<Json<ReorderResponse>> {
    req.validate()?;
    let mut tracker = state.tracker.lock().await;
    let order = tracker.reorder_ranking(req.from, req.to).await?;
    Ok(Json(ReorderResponse { order }))
}

#[axum::debug_handler]
pub async fn results(State(state): State<AppState>) -> Result<Json<ResultsResponse>> {
    let (result, responses) = {
        let mut tracker = state.tracker.lock().await;
        let result = tracker.view_results(state.scoring_model)?;
        (result, tracker.progress().responses.clone())
    };

    let analysis = match state.coach_client.submit_analysis(&result, &responses).await {
        Ok(analysis) => Some(analysis),
        Err(e) => {
            tracing::error!(error = ?e, "Assessment analysis failed");
            None
        }
    };

    Ok(Json(ResultsResponse { result, analysis }))
}
