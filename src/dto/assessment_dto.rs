use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::models::coaching::CoachingMessage;
use crate::models::phase::AssessmentPhase;
use crate::models::progress::AssessmentProgress;
use crate::models::question::Category;
use crate::models::response::Answer;
use crate::services::question_view::RenderedQuestion;
use crate::services::scoring_service::AssessmentResult;
use crate::services::tracker_service::AssessmentTracker;

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatusResponse {
    pub phase: AssessmentPhase,
    pub total_questions: usize,
    pub progress: AssessmentProgress,
    pub coaching_message: Option<CoachingMessage>,
}

impl AssessmentStatusResponse {
    pub fn from_tracker(tracker: &AssessmentTracker) -> Self {
        Self {
            phase: tracker.phase(),
            total_questions: tracker.bank().len(),
            progress: tracker.progress().clone(),
            coaching_message: tracker.coaching_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub answer: Answer,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub phase: AssessmentPhase,
    pub current_question_index: usize,
    pub current_category: Category,
    pub completed_categories: Vec<Category>,
    pub coaching_message: Option<CoachingMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReorderRequest {
    #[validate(range(max = 100))]
    pub from: usize,
    #[validate(range(max = 100))]
    pub to: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderResponse {
    pub order: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub index: usize,
    pub total: usize,
    pub question: RenderedQuestion,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsResponse {
    pub result: AssessmentResult,
    /// Remote analysis; `None` when the analysis backend failed.
    pub analysis: Option<JsonValue>,
}
