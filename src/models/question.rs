use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    TradingPsychology,
    BehavioralPatterns,
    RiskManagement,
    EmotionalIntelligence,
    DecisionMaking,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::TradingPsychology,
        Category::BehavioralPatterns,
        Category::RiskManagement,
        Category::EmotionalIntelligence,
        Category::DecisionMaking,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::TradingPsychology => "Trading Psychology",
            Category::BehavioralPatterns => "Behavioral Patterns",
            Category::RiskManagement => "Risk Management",
            Category::EmotionalIntelligence => "Emotional Intelligence",
            Category::DecisionMaking => "Decision Making",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Category::TradingPsychology => "trading_psychology",
            Category::BehavioralPatterns => "behavioral_patterns",
            Category::RiskManagement => "risk_management",
            Category::EmotionalIntelligence => "emotional_intelligence",
            Category::DecisionMaking => "decision_making",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentQuestion {
    pub id: String,
    pub category: Category,
    pub prompt: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

fn default_weight() -> f64 {
    1.0
}

/// Answer type of a question together with the data that type needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String> },
    LikertScale,
    Scenario { scenario: String, options: Vec<String> },
    Ranking { options: Vec<String> },
}

impl QuestionKind {
    pub fn options(&self) -> &[String] {
        match self {
            QuestionKind::MultipleChoice { options }
            | QuestionKind::Scenario { options, .. }
            | QuestionKind::Ranking { options } => options,
            QuestionKind::LikertScale => &[],
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::LikertScale => "likert_scale",
            QuestionKind::Scenario { .. } => "scenario",
            QuestionKind::Ranking { .. } => "ranking",
        }
    }
}

impl AssessmentQuestion {
    pub fn options(&self) -> &[String] {
        self.kind.options()
    }
}

/// Ordered, immutable question sequence the tracker steps through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionBank {
    pub(crate) questions: Vec<AssessmentQuestion>,
}

impl QuestionBank {
    pub fn new(questions: Vec<AssessmentQuestion>) -> Result<Self> {
        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(q.id.as_str()) {
                return Err(Error::BadRequest(format!(
                    "Duplicate question id '{}'",
                    q.id
                )));
            }
            if !matches!(q.kind, QuestionKind::LikertScale) && q.options().len() < 2 {
                return Err(Error::BadRequest(format!(
                    "Question '{}' of type {} needs at least two options",
                    q.id,
                    q.kind.type_name()
                )));
            }
            let mut options = HashSet::new();
            if let Some(dup) = q.options().iter().find(|o| !options.insert(o.as_str())) {
                return Err(Error::BadRequest(format!(
                    "Question '{}' lists option '{}' more than once",
                    q.id, dup
                )));
            }
        }
        Ok(Self { questions })
    }

    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let questions: Vec<AssessmentQuestion> = serde_json::from_str(&raw)?;
        tracing::info!(
            path = %path.as_ref().display(),
            count = questions.len(),
            "Loaded question bank"
        );
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AssessmentQuestion> {
        self.questions.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&AssessmentQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn category_at(&self, index: usize) -> Option<Category> {
        self.questions.get(index).map(|q| q.category)
    }

    pub fn questions(&self) -> &[AssessmentQuestion] {
        &self.questions
    }

    /// Index of the last question in `category`. Categories need not be
    /// contiguous.
    pub fn last_index_of(&self, category: Category) -> Option<usize> {
        self.questions.iter().rposition(|q| q.category == category)
    }
}
