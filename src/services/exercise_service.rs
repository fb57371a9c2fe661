use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::database::{load_json, save_json, KeyValueStore};
use crate::error::{Error, Result};
use crate::models::exercise::{ExerciseProgress, ReflectionExercise};

pub const EXERCISE_PROGRESS_KEY: &str = "reflection_exercise_progress";

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseStatus {
    pub exercise: ReflectionExercise,
    pub progress: ExerciseProgress,
    pub current_prompt: Option<String>,
    pub remaining_secs: u32,
}

/// Stepper over timed reflection exercises. Only one exercise runs at a
/// time and its progress survives restarts under its own storage key.
///
/// The countdown is derived from `step_started_at` on each read, so no
/// timer task outlives a step.
#[derive(Clone)]
pub struct ExerciseService {
    store: Arc<dyn KeyValueStore>,
    key: String,
    exercises: Arc<Vec<ReflectionExercise>>,
}

impl ExerciseService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        exercises: Vec<ReflectionExercise>,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            exercises: Arc::new(exercises),
        }
    }

    pub fn exercises(&self) -> &[ReflectionExercise] {
        &self.exercises
    }

    /// Starts `exercise_id` from its first step, replacing any running one.
    pub async fn start(&self, exercise_id: &str) -> Result<ExerciseStatus> {
        let exercise = self.find(exercise_id).ok_or_else(|| {
            Error::NotFound(format!("Exercise '{}' not found", exercise_id))
        })?;
        let progress = ExerciseProgress::new(exercise, Utc::now());
        self.save(&progress).await;
        tracing::info!(exercise_id, steps = progress.total_steps, "Exercise started");
        Ok(status_of(exercise, progress))
    }

    /// Running or finished exercise, if any. A snapshot naming an unknown
    /// exercise or a changed step count is ignored.
    pub async fn status(&self) -> Option<ExerciseStatus> {
        let progress = match load_json::<ExerciseProgress>(self.store.as_ref(), &self.key).await {
            Ok(progress) => progress?,
            Err(e) => {
                tracing::error!(error = ?e, key = %self.key, "Failed to restore exercise progress");
                return None;
            }
        };
        match self.find(&progress.exercise_id) {
            Some(exercise) if exercise.steps.len() == progress.total_steps => {
                Some(status_of(exercise, progress))
            }
            _ => {
                tracing::warn!(
                    exercise_id = %progress.exercise_id,
                    "Saved exercise progress does not match any exercise"
                );
                None
            }
        }
    }

    /// Completes the current step, keeping the reflection if one is given.
    pub async fn next_step(&self, reflection: Option<String>) -> Result<ExerciseStatus> {
        let ExerciseStatus {
            exercise,
            mut progress,
            ..
        } = self
            .status()
            .await
            .ok_or_else(|| Error::NotFound("No exercise is running".to_string()))?;
        if progress.completed {
            return Err(Error::BadRequest(format!(
                "Exercise '{}' is already complete",
                exercise.id
            )));
        }

        if progress.advance(reflection, Utc::now()) {
            tracing::info!(exercise_id = %exercise.id, "Exercise completed");
        }
        self.save(&progress).await;
        Ok(status_of(&exercise, progress))
    }

    pub async fn reset(&self) {
        if let Err(e) = self.store.clear(&self.key).await {
            tracing::error!(error = ?e, key = %self.key, "Failed to clear exercise progress");
        }
    }

    fn find(&self, id: &str) -> Option<&ReflectionExercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    async fn save(&self, progress: &ExerciseProgress) {
        let mut progress = progress.clone();
        progress.last_saved = Utc::now();
        if let Err(e) = save_json(self.store.as_ref(), &self.key, &progress).await {
            tracing::error!(error = ?e, key = %self.key, "Failed to save exercise progress");
        }
    }
}

fn status_of(exercise: &ReflectionExercise, progress: ExerciseProgress) -> ExerciseStatus {
    let now = Utc::now();
    let current_prompt = if progress.completed {
        None
    } else {
        exercise
            .steps
            .get(progress.current_step)
            .map(|s| s.prompt.clone())
    };
    ExerciseStatus {
        remaining_secs: progress.remaining_secs(exercise, now),
        current_prompt,
        exercise: exercise.clone(),
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn service(store: Arc<MemoryStore>) -> ExerciseService {
        ExerciseService::new(store, EXERCISE_PROGRESS_KEY, ReflectionExercise::builtin())
    }

    #[tokio::test]
    async fn exercise_runs_to_completion_and_survives_reload() {
        let store = Arc::new(MemoryStore::new());
        let exercises = service(store.clone());
        assert!(exercises.status().await.is_none());

        let started = exercises.start("pre_session").await.unwrap();
        assert_eq!(started.progress.current_step, 0);
        assert_eq!(started.remaining_secs, 60);
        assert_eq!(
            started.current_prompt.as_deref(),
            Some("Breathe slowly and notice your energy level.")
        );

        exercises.next_step(Some("a bit tired".into())).await.unwrap();

        let reloaded = service(store.clone());
        let status = reloaded.status().await.unwrap();
        assert_eq!(status.progress.current_step, 1);
        assert_eq!(status.progress.reflections, vec!["a bit tired".to_string()]);

        reloaded.next_step(None).await.unwrap();
        let done = reloaded.next_step(None).await.unwrap();
        assert!(done.progress.completed);
        assert_eq!(done.current_prompt, None);
        assert_eq!(done.remaining_secs, 0);
        assert!(matches!(
            reloaded.next_step(None).await,
            Err(Error::BadRequest(_))
        ));

        reloaded.reset().await;
        assert!(reloaded.status().await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_exercise_is_not_found() {
        let exercises = service(Arc::new(MemoryStore::new()));
        assert!(matches!(
            exercises.start("nope").await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            exercises.next_step(None).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn exercise_progress_does_not_touch_assessment_key() {
        let store = Arc::new(MemoryStore::new());
        service(store.clone()).start("tilt_reset").await.unwrap();
        assert!(store.get(EXERCISE_PROGRESS_KEY).await.unwrap().is_some());
        assert!(store
            .get(crate::config::DEFAULT_STORAGE_KEY)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn malformed_exercise_snapshot_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(EXERCISE_PROGRESS_KEY, "{broken".to_string())
            .await
            .unwrap();
        assert!(service(store).status().await.is_none());
    }
}
