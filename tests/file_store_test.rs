use std::sync::Arc;

use trader_assessment::{
    database::{FileStore, KeyValueStore},
    models::{
        phase::AssessmentPhase,
        question::{QuestionBank, QuestionKind},
        response::Answer,
    },
    services::{coaching_service::CoachingOverlay, tracker_service::AssessmentTracker},
};

const KEY: &str = "trader_assessment_progress";

async fn tracker_on(dir: &std::path::Path, bank: QuestionBank) -> AssessmentTracker {
    AssessmentTracker::hydrate(
        Arc::new(bank),
        Arc::new(FileStore::new(dir)),
        KEY,
        CoachingOverlay::default(),
    )
    .await
    .expect("hydrate tracker")
}

fn first_option(tracker: &AssessmentTracker) -> Answer {
    let index = tracker.progress().current_question_index;
    let question = tracker.bank().get(index).expect("current question");
    match &question.kind {
        QuestionKind::LikertScale => Answer::Scale(3),
        QuestionKind::Ranking { options } => Answer::Ranking(options.clone()),
        other => Answer::Choice(other.options()[0].clone()),
    }
}

#[tokio::test]
async fn file_store_set_get_clear() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("nested"));

    assert_eq!(store.get(KEY).await.unwrap(), None);
    store.clear(KEY).await.unwrap();

    store.set(KEY, "{\"a\":1}".to_string()).await.unwrap();
    assert!(dir.path().join("nested").join(format!("{}.json", KEY)).exists());
    assert_eq!(store.get(KEY).await.unwrap().as_deref(), Some("{\"a\":1}"));

    store.set(KEY, "{\"a\":2}".to_string()).await.unwrap();
    assert_eq!(store.get(KEY).await.unwrap().as_deref(), Some("{\"a\":2}"));

    store.clear(KEY).await.unwrap();
    assert_eq!(store.get(KEY).await.unwrap(), None);
}

#[tokio::test]
async fn progress_is_restored_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    let mut tracker = tracker_on(dir.path(), QuestionBank::builtin()).await;
    tracker.start().await.unwrap();
    for _ in 0..2 {
        let answer = first_option(&tracker);
        tracker.answer_question(answer).await.unwrap();
    }
    let saved = tracker.progress().clone();
    drop(tracker);

    let restored = tracker_on(dir.path(), QuestionBank::builtin()).await;
    assert_eq!(restored.phase(), AssessmentPhase::InProgress);
    assert_eq!(restored.progress().current_question_index, 2);
    assert_eq!(restored.progress().responses, saved.responses);
    assert_eq!(restored.progress().started_at, saved.started_at);
}

#[tokio::test]
async fn malformed_snapshot_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::new(dir.path())
        .set(KEY, "{not json".to_string())
        .await
        .unwrap();

    let tracker = tracker_on(dir.path(), QuestionBank::builtin()).await;
    assert_eq!(tracker.phase(), AssessmentPhase::Welcome);
    assert_eq!(tracker.progress().current_question_index, 0);
    assert!(tracker.progress().responses.is_empty());
}

#[tokio::test]
async fn snapshot_for_a_different_bank_is_ignored() {
    let dir = tempfile::tempdir().unwrap();

    let mut tracker = tracker_on(dir.path(), QuestionBank::builtin()).await;
    tracker.start().await.unwrap();
    let answer = first_option(&tracker);
    tracker.answer_question(answer).await.unwrap();
    drop(tracker);

    let smaller: Vec<_> = QuestionBank::builtin().questions()[..3].to_vec();
    let tracker = tracker_on(dir.path(), QuestionBank::new(smaller).unwrap()).await;
    assert_eq!(tracker.phase(), AssessmentPhase::Welcome);
    assert_eq!(tracker.progress().total_questions, 3);
}
