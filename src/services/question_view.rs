use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::question::{AssessmentQuestion, Category, QuestionKind};
use crate::models::response::{Answer, LIKERT_MAX, LIKERT_MIN};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum QuestionView {
    SingleSelect {
        options: Vec<String>,
        scenario: Option<String>,
        selected: Option<String>,
    },
    Likert {
        scale: Vec<u8>,
        selected: Option<u8>,
    },
    Ranking {
        order: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedQuestion {
    pub id: String,
    pub category: Category,
    pub prompt: String,
    #[serde(rename = "type")]
    pub question_type: &'static str,
    #[serde(flatten)]
    pub view: QuestionView,
    /// Answer the view implies without user input. Set for an unanswered
    /// ranking, whose identity order counts as an answer.
    #[serde(skip)]
    pub default_commit: Option<Answer>,
}

pub fn render(question: &AssessmentQuestion, current: Option<&Answer>) -> RenderedQuestion {
    let mut default_commit = None;

    let view = match &question.kind {
        QuestionKind::MultipleChoice { options } => QuestionView::SingleSelect {
            options: options.clone(),
            scenario: None,
            selected: selected_choice(current),
        },
        QuestionKind::Scenario { scenario, options } => QuestionView::SingleSelect {
            options: options.clone(),
            scenario: Some(scenario.clone()),
            selected: selected_choice(current),
        },
        QuestionKind::LikertScale => QuestionView::Likert {
            scale: (LIKERT_MIN..=LIKERT_MAX).collect(),
            selected: match current {
                Some(Answer::Scale(v)) => Some(*v),
                _ => None,
            },
        },
        QuestionKind::Ranking { options } => {
            let existing = current
                .filter(|answer| answer.fits(&question.kind))
                .and_then(Answer::as_ranking);
            let order = match existing {
                Some(order) => order.to_vec(),
                None => {
                    default_commit = Some(Answer::Ranking(options.clone()));
                    options.clone()
                }
            };
            QuestionView::Ranking { order }
        }
    };

    RenderedQuestion {
        id: question.id.clone(),
        category: question.category,
        prompt: question.prompt.clone(),
        question_type: question.kind.type_name(),
        view,
        default_commit,
    }
}

fn selected_choice(current: Option<&Answer>) -> Option<String> {
    match current {
        Some(Answer::Choice(value)) => Some(value.clone()),
        _ => None,
    }
}

/// Drag-and-drop reorder: removes the item at `from` and re-inserts it
/// at `to`.
pub fn move_item(order: &mut Vec<String>, from: usize, to: usize) -> Result<()> {
    if from >= order.len() || to >= order.len() {
        return Err(Error::BadRequest(format!(
            "Cannot move item {} to {} in a ranking of {}",
            from,
            to,
            order.len()
        )));
    }
    let item = order.remove(from);
    order.insert(to, item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(kind: QuestionKind) -> AssessmentQuestion {
        AssessmentQuestion {
            id: "q1".into(),
            category: Category::BehavioralPatterns,
            prompt: "Prompt".into(),
            weight: 1.0,
            kind,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unanswered_ranking_commits_identity_order() {
        let q = question(QuestionKind::Ranking {
            options: strings(&["X", "Y", "Z"]),
        });
        let rendered = render(&q, None);
        assert_eq!(
            rendered.view,
            QuestionView::Ranking {
                order: strings(&["X", "Y", "Z"])
            }
        );
        assert_eq!(
            rendered.default_commit,
            Some(Answer::Ranking(strings(&["X", "Y", "Z"])))
        );
    }

    #[test]
    fn answered_ranking_keeps_user_order() {
        let q = question(QuestionKind::Ranking {
            options: strings(&["X", "Y", "Z"]),
        });
        let answer = Answer::Ranking(strings(&["Z", "X", "Y"]));
        let rendered = render(&q, Some(&answer));
        assert_eq!(
            rendered.view,
            QuestionView::Ranking {
                order: strings(&["Z", "X", "Y"])
            }
        );
        assert_eq!(rendered.default_commit, None);
    }

    #[test]
    fn scenario_renders_as_single_select_with_text() {
        let q = question(QuestionKind::Scenario {
            scenario: "Market gaps down".into(),
            options: strings(&["Sell", "Hold"]),
        });
        let answer = Answer::Choice("Hold".into());
        let rendered = render(&q, Some(&answer));
        assert_eq!(rendered.question_type, "scenario");
        assert_eq!(
            rendered.view,
            QuestionView::SingleSelect {
                options: strings(&["Sell", "Hold"]),
                scenario: Some("Market gaps down".into()),
                selected: Some("Hold".into()),
            }
        );
    }

    #[test]
    fn likert_offers_one_to_five() {
        let rendered = render(&question(QuestionKind::LikertScale), Some(&Answer::Scale(2)));
        assert_eq!(
            rendered.view,
            QuestionView::Likert {
                scale: vec![1, 2, 3, 4, 5],
                selected: Some(2)
            }
        );
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["view"], "likert");
        assert_eq!(json["type"], "likert_scale");
    }

    #[test]
    fn move_item_removes_then_inserts() {
        let mut order = strings(&["a", "b", "c", "d"]);
        move_item(&mut order, 0, 2).unwrap();
        assert_eq!(order, strings(&["b", "c", "a", "d"]));
        move_item(&mut order, 3, 0).unwrap();
        assert_eq!(order, strings(&["d", "b", "c", "a"]));
        assert!(move_item(&mut order, 4, 0).is_err());
    }
}
