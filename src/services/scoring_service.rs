//! Assessment scoring.
//!
//! Two formulas exist for the same operation and they do not agree. The
//! choice between them is a product decision, so callers always name the
//! model explicitly; there is no default.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::models::progress::AssessmentProgress;
use crate::models::question::{Category, QuestionBank, QuestionKind};
use crate::models::response::{Answer, LIKERT_MAX};

const RANKING_FLAT_SCORE: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringModel {
    /// `round(ratio * 85 + random * 15)`; ratio is answered / total.
    CompletionHeuristic,
    /// Ordinal position of each answer mapped onto 0-100, averaged per
    /// category. Question weights are not consulted.
    OrdinalPosition,
}

impl FromStr for ScoringModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "completion_heuristic" => Ok(Self::CompletionHeuristic),
            "ordinal_position" => Ok(Self::OrdinalPosition),
            other => Err(format!(
                "unknown scoring model '{}' (expected completion_heuristic or ordinal_position)",
                other
            )),
        }
    }
}

impl fmt::Display for ScoringModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringModel::CompletionHeuristic => f.write_str("completion_heuristic"),
            ScoringModel::OrdinalPosition => f.write_str("ordinal_position"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub model: ScoringModel,
    pub overall_score: u32,
    pub category_scores: BTreeMap<Category, u32>,
    pub answered: usize,
    pub total_questions: usize,
    pub completed_at: DateTime<Utc>,
}

pub struct ScoringService;

impl ScoringService {
    pub fn score(
        model: ScoringModel,
        bank: &QuestionBank,
        progress: &AssessmentProgress,
    ) -> AssessmentResult {
        let (overall_score, category_scores) = match model {
            ScoringModel::CompletionHeuristic => {
                let noise: f64 = rand::thread_rng().gen();
                (
                    Self::completion_heuristic(progress.completion_ratio(), noise),
                    BTreeMap::new(),
                )
            }
            ScoringModel::OrdinalPosition => Self::ordinal_position(bank, progress),
        };

        tracing::info!(
            model = %model,
            overall_score,
            answered = progress.responses.len(),
            total = progress.total_questions,
            "Scored assessment"
        );

        AssessmentResult {
            model,
            overall_score,
            category_scores,
            answered: progress.responses.len(),
            total_questions: progress.total_questions,
            completed_at: Utc::now(),
        }
    }

    /// `noise` is expected in `[0, 1)`.
    pub fn completion_heuristic(ratio: f64, noise: f64) -> u32 {
        (ratio.clamp(0.0, 1.0) * 85.0 + noise * 15.0).round() as u32
    }

    pub fn ordinal_position(
        bank: &QuestionBank,
        progress: &AssessmentProgress,
    ) -> (u32, BTreeMap<Category, u32>) {
        let mut sums: BTreeMap<Category, (f64, usize)> = BTreeMap::new();

        for response in &progress.responses {
            let Some(question) = bank.find(&response.question_id) else {
                tracing::warn!(
                    question_id = %response.question_id,
                    "Response refers to an unknown question, skipping"
                );
                continue;
            };
            let Some(value) = Self::answer_percentage(&question.kind, &response.answer) else {
                continue;
            };
            let entry = sums.entry(question.category).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }

        let averages: BTreeMap<Category, f64> = sums
            .into_iter()
            .map(|(category, (sum, count))| (category, sum / count as f64))
            .collect();

        let overall = if averages.is_empty() {
            0.0
        } else {
            averages.values().sum::<f64>() / averages.len() as f64
        };

        let category_scores = averages
            .into_iter()
            .map(|(category, avg)| (category, avg.round() as u32))
            .collect();

        (overall.round() as u32, category_scores)
    }

    /// Percentage for a single answer, or `None` if the answer does not
    /// fit the question.
    pub fn answer_percentage(kind: &QuestionKind, answer: &Answer) -> Option<f64> {
        match (kind, answer) {
            (QuestionKind::MultipleChoice { options }, Answer::Choice(value))
            | (QuestionKind::Scenario { options, .. }, Answer::Choice(value)) => {
                let index = options.iter().position(|o| o == value)?;
                Some((index + 1) as f64 / options.len() as f64 * 100.0)
            }
            (QuestionKind::LikertScale, Answer::Scale(value)) => {
                Some(*value as f64 / LIKERT_MAX as f64 * 100.0)
            }
            (QuestionKind::Ranking { .. }, Answer::Ranking(_)) => Some(RANKING_FLAT_SCORE),
            _ => None,
        }
    }
}
