use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::{Category, QuestionKind};

pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;

/// Answer payload; its shape depends on the question type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Scale(u8),
    Choice(String),
    Ranking(Vec<String>),
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Choice(s) => s.trim().is_empty(),
            Answer::Ranking(items) => items.is_empty(),
            Answer::Scale(_) => false,
        }
    }

    pub fn as_ranking(&self) -> Option<&[String]> {
        match self {
            Answer::Ranking(order) => Some(order),
            _ => None,
        }
    }

    /// Whether this answer has the shape `kind` expects.
    pub fn fits(&self, kind: &QuestionKind) -> bool {
        match (kind, self) {
            (QuestionKind::MultipleChoice { options }, Answer::Choice(value))
            | (QuestionKind::Scenario { options, .. }, Answer::Choice(value)) => {
                options.contains(value)
            }
            (QuestionKind::LikertScale, Answer::Scale(value)) => {
                (LIKERT_MIN..=LIKERT_MAX).contains(value)
            }
            (QuestionKind::Ranking { options }, Answer::Ranking(order)) => {
                let mut expected = options.clone();
                let mut given = order.clone();
                expected.sort();
                given.sort();
                expected == given
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub question_id: String,
    pub answer: Answer,
    pub timestamp: DateTime<Utc>,
    pub category: Category,
}
