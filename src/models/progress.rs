use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::{Category, QuestionBank};
use super::response::AssessmentResponse;

/// Mutable aggregate of an assessment run. Its serialized form is the
/// progress snapshot written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentProgress {
    pub current_question_index: usize,
    pub total_questions: usize,
    pub current_category: Category,
    pub completed_categories: Vec<Category>,
    pub responses: Vec<AssessmentResponse>,
    pub started_at: DateTime<Utc>,
    pub last_saved: DateTime<Utc>,
    pub is_paused: bool,
}

/// Outcome of moving the cursor one question forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub next_index: usize,
    /// Category whose last question was just answered, when the move
    /// crossed a category boundary.
    pub left_category: Option<Category>,
    pub entered_category: Option<Category>,
    pub finished: bool,
}

impl AssessmentProgress {
    pub fn new(bank: &QuestionBank) -> Self {
        let now = Utc::now();
        Self {
            current_question_index: 0,
            total_questions: bank.len(),
            current_category: bank.category_at(0).unwrap_or_default(),
            completed_categories: Vec::new(),
            responses: Vec::new(),
            started_at: now,
            last_saved: now,
            is_paused: false,
        }
    }

    /// Stores `response`, replacing any earlier response to the same
    /// question in place.
    pub fn record_response(&mut self, response: AssessmentResponse) {
        match self
            .responses
            .iter()
            .position(|r| r.question_id == response.question_id)
        {
            Some(pos) => self.responses[pos] = response,
            None => self.responses.push(response),
        }
    }

    pub fn response_for(&self, question_id: &str) -> Option<&AssessmentResponse> {
        self.responses.iter().find(|r| r.question_id == question_id)
    }

    pub fn mark_category_completed(&mut self, category: Category) {
        if !self.completed_categories.contains(&category) {
            self.completed_categories.push(category);
        }
    }

    pub fn advance(&mut self, bank: &QuestionBank) -> Advance {
        let from = self.current_category;
        let next_index = self.current_question_index + 1;
        self.current_question_index = next_index;

        if next_index >= self.total_questions {
            self.mark_category_completed(from);
            return Advance {
                next_index,
                left_category: Some(from),
                entered_category: None,
                finished: true,
            };
        }

        let to = bank.category_at(next_index).unwrap_or(from);
        self.current_category = to;
        if to == from {
            return Advance {
                next_index,
                left_category: None,
                entered_category: None,
                finished: false,
            };
        }

        // A category recurring later in the bank stays open until the cursor
        // passes its last question.
        let from_done = bank
            .last_index_of(from)
            .map_or(true, |last| last < next_index);
        if from_done {
            self.mark_category_completed(from);
        }
        Advance {
            next_index,
            left_category: from_done.then_some(from),
            entered_category: Some(to),
            finished: false,
        }
    }

    pub fn completion_ratio(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        (self.responses.len() as f64 / self.total_questions as f64).min(1.0)
    }

    /// A restored snapshot is only usable if its cursor still points
    /// into the current bank.
    pub fn fits(&self, bank: &QuestionBank) -> bool {
        self.total_questions == bank.len() && self.current_question_index < bank.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{AssessmentQuestion, QuestionKind};
    use crate::models::response::Answer;

    fn bank(categories: &[Category]) -> QuestionBank {
        let questions = categories
            .iter()
            .enumerate()
            .map(|(i, c)| AssessmentQuestion {
                id: format!("q{}", i + 1),
                category: *c,
                prompt: format!("Question {}", i + 1),
                weight: 1.0,
                kind: QuestionKind::LikertScale,
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    }

    fn response(id: &str, value: u8) -> AssessmentResponse {
        AssessmentResponse {
            question_id: id.to_string(),
            answer: Answer::Scale(value),
            timestamp: Utc::now(),
            category: Category::RiskManagement,
        }
    }

    #[test]
    fn record_response_replaces_by_question_id() {
        let mut progress = AssessmentProgress::new(&bank(&[Category::RiskManagement; 2]));
        progress.record_response(response("q1", 2));
        progress.record_response(response("q2", 3));
        progress.record_response(response("q1", 5));

        assert_eq!(progress.responses.len(), 2);
        assert_eq!(progress.responses[0].question_id, "q1");
        assert_eq!(progress.responses[0].answer, Answer::Scale(5));
        assert_eq!(progress.response_for("q2").unwrap().answer, Answer::Scale(3));
    }

    #[test]
    fn advance_marks_category_on_boundary() {
        let a = Category::TradingPsychology;
        let b = Category::BehavioralPatterns;
        let bank = bank(&[a, a, b]);
        let mut progress = AssessmentProgress::new(&bank);

        let step = progress.advance(&bank);
        assert_eq!(step.next_index, 1);
        assert_eq!(step.left_category, None);
        assert!(progress.completed_categories.is_empty());

        let step = progress.advance(&bank);
        assert_eq!(step.left_category, Some(a));
        assert_eq!(step.entered_category, Some(b));
        assert_eq!(progress.current_category, b);
        assert_eq!(progress.completed_categories, vec![a]);

        let step = progress.advance(&bank);
        assert!(step.finished);
        assert_eq!(progress.current_question_index, 3);
        assert_eq!(progress.completed_categories, vec![a, b]);
    }

    #[test]
    fn recurring_category_completes_after_its_last_question() {
        let a = Category::TradingPsychology;
        let b = Category::RiskManagement;
        let bank = bank(&[a, b, a]);
        let mut progress = AssessmentProgress::new(&bank);

        let step = progress.advance(&bank);
        assert_eq!(step.left_category, None);
        assert_eq!(step.entered_category, Some(b));
        assert!(progress.completed_categories.is_empty());

        let step = progress.advance(&bank);
        assert_eq!(step.left_category, Some(b));
        assert_eq!(step.entered_category, Some(a));
        assert_eq!(progress.completed_categories, vec![b]);

        let step = progress.advance(&bank);
        assert!(step.finished);
        assert_eq!(progress.completed_categories, vec![b, a]);
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let progress = AssessmentProgress::new(&bank(&[Category::DecisionMaking]));
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["currentQuestionIndex"], 0);
        assert_eq!(json["currentCategory"], "decision_making");
        assert_eq!(json["isPaused"], false);
        assert!(json["lastSaved"].is_string());
    }

    #[test]
    fn fits_rejects_snapshot_from_other_bank() {
        let small = bank(&[Category::DecisionMaking]);
        let large = bank(&[Category::DecisionMaking; 3]);
        let mut progress = AssessmentProgress::new(&large);
        progress.current_question_index = 2;
        assert!(progress.fits(&large));
        assert!(!progress.fits(&small));
    }
}
