use chrono::Utc;
use std::sync::Arc;

use crate::database::{load_json, save_json, KeyValueStore};
use crate::error::{Error, Result};
use crate::models::coaching::{CoachingMessage, CoachingTrigger};
use crate::models::phase::AssessmentPhase;
use crate::models::progress::{Advance, AssessmentProgress};
use crate::models::question::{AssessmentQuestion, QuestionBank, QuestionKind};
use crate::models::response::{Answer, AssessmentResponse};
use crate::services::coaching_service::CoachingOverlay;
use crate::services::question_view::{self, RenderedQuestion};
use crate::services::scoring_service::{AssessmentResult, ScoringModel, ScoringService};

/// Every fifth answered question earns a milestone message.
const MILESTONE_EVERY: usize = 5;

/// Linear stepper over a question bank with resumable progress.
///
/// Progress is written to the store after every mutation while the
/// assessment is in progress or paused, and removed once it completes or
/// restarts. Storage failures are logged and otherwise ignored.
pub struct AssessmentTracker {
    bank: Arc<QuestionBank>,
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    overlay: CoachingOverlay,
    phase: AssessmentPhase,
    progress: AssessmentProgress,
    result: Option<AssessmentResult>,
}

impl AssessmentTracker {
    /// Builds a tracker and restores any saved progress from `store`.
    pub async fn hydrate(
        bank: Arc<QuestionBank>,
        store: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
        overlay: CoachingOverlay,
    ) -> Result<Self> {
        if bank.is_empty() {
            return Err(Error::NoQuestions);
        }

        let storage_key = storage_key.into();
        let mut tracker = Self {
            progress: AssessmentProgress::new(&bank),
            bank,
            store,
            storage_key,
            overlay,
            phase: AssessmentPhase::Welcome,
            result: None,
        };

        let restored =
            load_json::<AssessmentProgress>(tracker.store.as_ref(), &tracker.storage_key).await;
        match restored {
            Ok(Some(saved)) if saved.fits(&tracker.bank) => {
                tracker.phase = if saved.is_paused {
                    AssessmentPhase::Paused
                } else {
                    AssessmentPhase::InProgress
                };
                tracing::info!(
                    key = %tracker.storage_key,
                    index = saved.current_question_index,
                    responses = saved.responses.len(),
                    phase = %tracker.phase,
                    "Restored assessment progress"
                );
                tracker.progress = saved;
            }
            Ok(Some(saved)) => {
                tracing::warn!(
                    key = %tracker.storage_key,
                    saved_total = saved.total_questions,
                    saved_index = saved.current_question_index,
                    bank_total = tracker.bank.len(),
                    "Saved progress does not match the question bank, starting fresh"
                );
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(
                    error = ?e,
                    key = %tracker.storage_key,
                    "Failed to restore assessment progress"
                );
            }
        }

        Ok(tracker)
    }

    pub fn phase(&self) -> AssessmentPhase {
        self.phase
    }

    pub fn progress(&self) -> &AssessmentProgress {
        &self.progress
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn coaching_message(&self) -> Option<CoachingMessage> {
        self.overlay.current()
    }

    pub fn result(&self) -> Option<&AssessmentResult> {
        self.result.as_ref()
    }

    pub async fn start(&mut self) -> Result<()> {
        self.require(AssessmentPhase::Welcome, "start")?;
        self.progress = AssessmentProgress::new(&self.bank);
        self.result = None;
        self.phase = AssessmentPhase::InProgress;
        self.persist().await;
        tracing::info!(total = self.progress.total_questions, "Assessment started");
        Ok(())
    }

    pub async fn pause(&mut self) -> Result<()> {
        self.require(AssessmentPhase::InProgress, "pause")?;
        self.progress.is_paused = true;
        self.phase = AssessmentPhase::Paused;
        self.persist().await;
        tracing::info!(index = self.progress.current_question_index, "Assessment paused");
        Ok(())
    }

    pub async fn resume(&mut self) -> Result<()> {
        self.require(AssessmentPhase::Paused, "resume")?;
        self.progress.is_paused = false;
        self.phase = AssessmentPhase::InProgress;
        self.persist().await;
        tracing::info!(index = self.progress.current_question_index, "Assessment resumed");
        Ok(())
    }

    /// Records a draft answer for the current question without advancing.
    pub async fn select_answer(&mut self, answer: Answer) -> Result<()> {
        self.require(AssessmentPhase::InProgress, "select an answer")?;
        let bank = Arc::clone(&self.bank);
        let question = self.current_question_in(&bank)?;
        validate_answer(question, &answer)?;
        self.record(question, answer);
        self.persist().await;
        Ok(())
    }

    /// Records the answer for the current question and moves on.
    pub async fn answer_question(&mut self, answer: Answer) -> Result<Advance> {
        self.require(AssessmentPhase::InProgress, "answer a question")?;
        let bank = Arc::clone(&self.bank);
        let question = self.current_question_in(&bank)?;
        validate_answer(question, &answer)?;
        self.record(question, answer);

        let step = self.progress.advance(&bank);
        tracing::debug!(
            question_id = %question.id,
            next_index = step.next_index,
            finished = step.finished,
            "Answer recorded"
        );

        if step.finished {
            self.phase = AssessmentPhase::Completed;
            self.clear_storage().await;
            self.overlay
                .show(CoachingMessage::for_trigger(CoachingTrigger::Completion));
            tracing::info!(
                responses = self.progress.responses.len(),
                "Assessment completed"
            );
            return Ok(step);
        }

        self.persist().await;

        match (step.left_category, step.entered_category) {
            (Some(from), Some(to)) => self.overlay.show(CoachingMessage::for_trigger(
                CoachingTrigger::CategoryTransition { from, to },
            )),
            _ if step.next_index % MILESTONE_EVERY == 0 => self.overlay.show(
                CoachingMessage::for_trigger(CoachingTrigger::Milestone {
                    answered: step.next_index,
                }),
            ),
            _ => {}
        }

        Ok(step)
    }

    /// Renders the current question. An unanswered ranking commits its
    /// identity order as the answer.
    pub async fn current_question(&mut self) -> Result<RenderedQuestion> {
        if !self.phase.is_active() {
            return Err(Error::InvalidTransition {
                phase: self.phase,
                action: "show a question",
            });
        }
        let bank = Arc::clone(&self.bank);
        let question = self.current_question_in(&bank)?;
        let current = self
            .progress
            .response_for(&question.id)
            .map(|r| r.answer.clone());
        let rendered = question_view::render(question, current.as_ref());

        if let Some(answer) = rendered.default_commit.clone() {
            if self.phase == AssessmentPhase::InProgress {
                self.record(question, answer);
                self.persist().await;
            }
        }

        Ok(rendered)
    }

    /// Moves one item of the current ranking answer from `from` to `to`.
    pub async fn reorder_ranking(&mut self, from: usize, to: usize) -> Result<Vec<String>> {
        self.require(AssessmentPhase::InProgress, "reorder a ranking")?;
        let bank = Arc::clone(&self.bank);
        let question = self.current_question_in(&bank)?;
        let QuestionKind::Ranking { options } = &question.kind else {
            return Err(Error::BadRequest(format!(
                "Question '{}' is not a ranking question",
                question.id
            )));
        };

        let mut order = self
            .progress
            .response_for(&question.id)
            .and_then(|r| r.answer.as_ranking())
            .map(|o| o.to_vec())
            .unwrap_or_else(|| options.clone());
        question_view::move_item(&mut order, from, to)?;

        self.record(question, Answer::Ranking(order.clone()));
        self.persist().await;
        Ok(order)
    }

    /// Scores a completed assessment and moves to the results view.
    /// Calling it again in the results phase returns the same result.
    pub fn view_results(&mut self, model: ScoringModel) -> Result<AssessmentResult> {
        if self.phase == AssessmentPhase::Results {
            if let Some(result) = &self.result {
                return Ok(result.clone());
            }
        }
        self.require(AssessmentPhase::Completed, "view results")?;

        let result = ScoringService::score(model, &self.bank, &self.progress);
        self.result = Some(result.clone());
        self.phase = AssessmentPhase::Results;
        Ok(result)
    }

    /// Back to the welcome screen from any phase, discarding progress.
    pub async fn restart(&mut self) {
        self.overlay.dismiss();
        self.clear_storage().await;
        self.progress = AssessmentProgress::new(&self.bank);
        self.result = None;
        self.phase = AssessmentPhase::Welcome;
        tracing::info!("Assessment restarted");
    }

    fn require(&self, expected: AssessmentPhase, action: &'static str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                phase: self.phase,
                action,
            })
        }
    }

    fn current_question_in<'a>(&self, bank: &'a QuestionBank) -> Result<&'a AssessmentQuestion> {
        bank.get(self.progress.current_question_index).ok_or_else(|| {
            Error::NotFound(format!(
                "No question at index {}",
                self.progress.current_question_index
            ))
        })
    }

    fn record(&mut self, question: &AssessmentQuestion, answer: Answer) {
        self.progress.record_response(AssessmentResponse {
            question_id: question.id.clone(),
            answer,
            timestamp: Utc::now(),
            category: question.category,
        });
    }

    async fn persist(&mut self) {
        self.progress.last_saved = Utc::now();
        if let Err(e) = save_json(self.store.as_ref(), &self.storage_key, &self.progress).await {
            tracing::error!(
                error = ?e,
                key = %self.storage_key,
                "Failed to save assessment progress"
            );
        }
    }

    async fn clear_storage(&self) {
        if let Err(e) = self.store.clear(&self.storage_key).await {
            tracing::error!(
                error = ?e,
                key = %self.storage_key,
                "Failed to clear assessment progress"
            );
        }
    }
}

fn validate_answer(question: &AssessmentQuestion, answer: &Answer) -> Result<()> {
    if answer.is_empty() {
        return Err(Error::BadRequest(format!(
            "An answer is required for question '{}'",
            question.id
        )));
    }
    if !answer.fits(&question.kind) {
        return Err(Error::BadRequest(format!(
            "Answer does not fit {} question '{}'",
            question.kind.type_name(),
            question.id
        )));
    }
    Ok(())
}
