use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoachingTrigger {
    Milestone { answered: usize },
    CategoryTransition { from: Category, to: Category },
    Completion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingMessage {
    /// Translation key for the dashboard's string table.
    pub key: String,
    pub text: String,
    pub trigger: CoachingTrigger,
    pub shown_at: DateTime<Utc>,
}

impl CoachingMessage {
    pub fn for_trigger(trigger: CoachingTrigger) -> Self {
        let (key, text) = match &trigger {
            CoachingTrigger::Milestone { answered } => (
                "coaching.milestone".to_string(),
                format!(
                    "{} questions done. Take a breath and answer the next ones as you actually trade, not as you wish you traded.",
                    answered
                ),
            ),
            CoachingTrigger::CategoryTransition { from, to } => (
                format!("coaching.transition.{}", to.key()),
                format!(
                    "{} complete. Next up: {}. {}",
                    from.label(),
                    to.label(),
                    category_hint(*to)
                ),
            ),
            CoachingTrigger::Completion => (
                "coaching.completion".to_string(),
                "Assessment complete. Your profile is ready to review.".to_string(),
            ),
        };

        Self {
            key,
            text,
            trigger,
            shown_at: Utc::now(),
        }
    }
}

fn category_hint(category: Category) -> &'static str {
    match category {
        Category::TradingPsychology => "Think about your mindset under pressure.",
        Category::BehavioralPatterns => "Think about what you repeat, good and bad.",
        Category::RiskManagement => "Think about how you size and protect positions.",
        Category::EmotionalIntelligence => "Think about how you notice and handle emotions.",
        Category::DecisionMaking => "Think about how you commit to a trade.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_message_names_both_categories() {
        let msg = CoachingMessage::for_trigger(CoachingTrigger::CategoryTransition {
            from: Category::TradingPsychology,
            to: Category::RiskManagement,
        });
        assert_eq!(msg.key, "coaching.transition.risk_management");
        assert!(msg.text.starts_with("Trading Psychology complete. Next up: Risk Management."));
    }

    #[test]
    fn trigger_serializes_with_kind_tag() {
        let json = serde_json::to_value(CoachingTrigger::Milestone { answered: 5 }).unwrap();
        assert_eq!(json["kind"], "milestone");
        assert_eq!(json["answered"], 5);
    }
}
