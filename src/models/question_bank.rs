use super::question::{AssessmentQuestion, Category, QuestionBank, QuestionKind};

fn choice(id: &str, category: Category, prompt: &str, options: &[&str]) -> AssessmentQuestion {
    AssessmentQuestion {
        id: id.to_string(),
        category,
        prompt: prompt.to_string(),
        weight: 1.0,
        kind: QuestionKind::MultipleChoice {
            options: options.iter().map(|o| o.to_string()).collect(),
        },
    }
}

fn likert(id: &str, category: Category, prompt: &str) -> AssessmentQuestion {
    AssessmentQuestion {
        id: id.to_string(),
        category,
        prompt: prompt.to_string(),
        weight: 1.0,
        kind: QuestionKind::LikertScale,
    }
}

fn scenario(
    id: &str,
    category: Category,
    prompt: &str,
    situation: &str,
    options: &[&str],
) -> AssessmentQuestion {
    AssessmentQuestion {
        id: id.to_string(),
        category,
        prompt: prompt.to_string(),
        weight: 1.5,
        kind: QuestionKind::Scenario {
            scenario: situation.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        },
    }
}

fn ranking(id: &str, category: Category, prompt: &str, options: &[&str]) -> AssessmentQuestion {
    AssessmentQuestion {
        id: id.to_string(),
        category,
        prompt: prompt.to_string(),
        weight: 1.0,
        kind: QuestionKind::Ranking {
            options: options.iter().map(|o| o.to_string()).collect(),
        },
    }
}

impl QuestionBank {
    /// Built-in trader profile questionnaire, grouped by category in
    /// presentation order. Choice options are listed from least to most
    /// disciplined response.
    pub fn builtin() -> Self {
        use Category::*;

        let questions = vec![
            choice(
                "tp_1",
                TradingPsychology,
                "After three losing trades in a row, what do you usually do?",
                &[
                    "Double my size to win it back",
                    "Keep trading but feel on edge",
                    "Reduce size for the next trades",
                    "Stop for the day and review",
                ],
            ),
            likert(
                "tp_2",
                TradingPsychology,
                "I can sit through a drawdown without changing my plan.",
            ),
            scenario(
                "tp_3",
                TradingPsychology,
                "How do you respond?",
                "A position you closed early keeps running and would have doubled your profit.",
                &[
                    "Re-enter immediately at a worse price",
                    "Feel frustrated for the rest of the session",
                    "Note it and move on",
                    "Review whether the exit followed the plan",
                ],
            ),
            likert(
                "bp_1",
                BehavioralPatterns,
                "I follow my written trading rules even when I feel confident.",
            ),
            choice(
                "bp_2",
                BehavioralPatterns,
                "How often do you move a stop loss further away once in a trade?",
                &["Most trades", "Sometimes", "Rarely", "Never"],
            ),
            ranking(
                "bp_3",
                BehavioralPatterns,
                "Rank these habits from most to least present in your trading.",
                &[
                    "Overtrading after a win",
                    "Hesitating on valid setups",
                    "Chasing price",
                    "Ignoring the journal",
                ],
            ),
            choice(
                "rm_1",
                RiskManagement,
                "How much of your account do you risk on a single trade?",
                &["More than 5%", "3-5%", "1-2%", "Less than 1%"],
            ),
            scenario(
                "rm_2",
                RiskManagement,
                "What is your next step?",
                "You hit your daily loss limit one hour into the session and see an A+ setup forming.",
                &[
                    "Take it with double size",
                    "Take it with normal size",
                    "Paper trade it",
                    "Close the platform for the day",
                ],
            ),
            likert(
                "rm_3",
                RiskManagement,
                "I know my maximum loss before I enter every trade.",
            ),
            likert(
                "ei_1",
                EmotionalIntelligence,
                "I notice physical signs of stress while I trade.",
            ),
            choice(
                "ei_2",
                EmotionalIntelligence,
                "Which statement best describes you after a big winning day?",
                &[
                    "I feel unstoppable and size up",
                    "I trade more the next day",
                    "I stay with my routine",
                    "I review what went right with the same care as a loss",
                ],
            ),
            ranking(
                "ei_3",
                EmotionalIntelligence,
                "Rank the emotions that most often influence your decisions.",
                &["Fear", "Greed", "Boredom", "Regret"],
            ),
            scenario(
                "dm_1",
                DecisionMaking,
                "What do you do?",
                "Your setup triggers but a well-known commentator posts a strong opposite view.",
                &[
                    "Take the opposite trade",
                    "Skip the trade",
                    "Take it with reduced size",
                    "Take it as planned",
                ],
            ),
            likert(
                "dm_2",
                DecisionMaking,
                "I decide entries and exits before the market opens.",
            ),
            choice(
                "dm_3",
                DecisionMaking,
                "How do you evaluate a trading decision?",
                &[
                    "By whether it made money",
                    "By how I felt afterwards",
                    "By whether it matched a setup",
                    "By process quality over a sample of trades",
                ],
            ),
        ];

        Self { questions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bank_is_valid_and_covers_every_category() {
        let bank = QuestionBank::builtin();
        let revalidated = QuestionBank::new(bank.questions().to_vec()).expect("valid bank");
        assert_eq!(revalidated.len(), 15);
        for category in Category::ALL {
            let count = bank.questions().iter().filter(|q| q.category == category).count();
            assert_eq!(count, 3, "{}", category);
        }
    }

    #[test]
    fn builtin_bank_keeps_categories_contiguous() {
        let bank = QuestionBank::builtin();
        let mut seen: Vec<Category> = Vec::new();
        for q in bank.questions() {
            if seen.last() != Some(&q.category) {
                assert!(!seen.contains(&q.category), "{} appears twice", q.category);
                seen.push(q.category);
            }
        }
    }
}
