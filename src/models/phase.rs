use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages of the assessment wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentPhase {
    #[default]
    Welcome,
    InProgress,
    Paused,
    Completed,
    Results,
}

impl AssessmentPhase {
    /// Phases whose progress is mirrored to storage.
    pub fn is_active(&self) -> bool {
        matches!(self, AssessmentPhase::InProgress | AssessmentPhase::Paused)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentPhase::Welcome => "welcome",
            AssessmentPhase::InProgress => "in_progress",
            AssessmentPhase::Paused => "paused",
            AssessmentPhase::Completed => "completed",
            AssessmentPhase::Results => "results",
        }
    }
}

impl fmt::Display for AssessmentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
