use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStep {
    pub prompt: String,
    /// Countdown length for the step.
    pub duration_secs: u32,
}

/// Guided reflection made of timed steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionExercise {
    pub id: String,
    pub title: String,
    pub steps: Vec<ExerciseStep>,
}

fn step(prompt: &str, duration_secs: u32) -> ExerciseStep {
    ExerciseStep {
        prompt: prompt.to_string(),
        duration_secs,
    }
}

impl ReflectionExercise {
    pub fn builtin() -> Vec<ReflectionExercise> {
        vec![
            ReflectionExercise {
                id: "loss_review".to_string(),
                title: "Reviewing a losing trade".to_string(),
                steps: vec![
                    step("Describe the trade without judging it.", 120),
                    step("What were you feeling right before entry?", 90),
                    step("Which rule of your plan did the trade follow or break?", 90),
                    step("Write one thing you will do differently next time.", 60),
                ],
            },
            ReflectionExercise {
                id: "pre_session".to_string(),
                title: "Pre-session check-in".to_string(),
                steps: vec![
                    step("Breathe slowly and notice your energy level.", 60),
                    step("Name the setups you are allowed to take today.", 90),
                    step("Set your maximum daily loss and say it out loud.", 30),
                ],
            },
            ReflectionExercise {
                id: "tilt_reset".to_string(),
                title: "Resetting after tilt".to_string(),
                steps: vec![
                    step("Step away from the screen.", 120),
                    step("Write down the thought that is pushing you to trade.", 90),
                    step("Decide whether you are done for the day.", 60),
                ],
            },
        ]
    }
}

/// Stepper state of the running exercise. Serialized as its own
/// snapshot, separate from assessment progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgress {
    pub exercise_id: String,
    pub current_step: usize,
    pub total_steps: usize,
    pub step_started_at: DateTime<Utc>,
    pub reflections: Vec<String>,
    pub completed: bool,
    pub last_saved: DateTime<Utc>,
}

impl ExerciseProgress {
    pub fn new(exercise: &ReflectionExercise, now: DateTime<Utc>) -> Self {
        Self {
            exercise_id: exercise.id.clone(),
            current_step: 0,
            total_steps: exercise.steps.len(),
            step_started_at: now,
            reflections: Vec::new(),
            completed: false,
            last_saved: now,
        }
    }

    /// Seconds left on the current step's countdown at `now`.
    pub fn remaining_secs(&self, exercise: &ReflectionExercise, now: DateTime<Utc>) -> u32 {
        if self.completed {
            return 0;
        }
        let Some(step) = exercise.steps.get(self.current_step) else {
            return 0;
        };
        let elapsed = (now - self.step_started_at).num_seconds().max(0);
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        step.duration_secs.saturating_sub(elapsed)
    }

    /// Moves to the next step, restarting the countdown. Returns true
    /// once the last step has been passed.
    pub fn advance(&mut self, reflection: Option<String>, now: DateTime<Utc>) -> bool {
        if let Some(text) = reflection.filter(|t| !t.trim().is_empty()) {
            self.reflections.push(text);
        }
        self.current_step += 1;
        self.step_started_at = now;
        if self.current_step >= self.total_steps {
            self.current_step = self.total_steps;
            self.completed = true;
        }
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn builtin_exercises_have_steps_and_unique_ids() {
        let all = ReflectionExercise::builtin();
        let ids: std::collections::HashSet<_> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), all.len());
        assert!(all.iter().all(|e| !e.steps.is_empty()));
    }

    #[test]
    fn countdown_runs_per_step() {
        let exercise = &ReflectionExercise::builtin()[1];
        let t0 = Utc::now();
        let mut progress = ExerciseProgress::new(exercise, t0);

        assert_eq!(progress.remaining_secs(exercise, t0), 60);
        assert_eq!(progress.remaining_secs(exercise, t0 + Duration::seconds(45)), 15);
        assert_eq!(progress.remaining_secs(exercise, t0 + Duration::seconds(600)), 0);

        let t1 = t0 + Duration::seconds(70);
        assert!(!progress.advance(Some("tired".into()), t1));
        assert_eq!(progress.current_step, 1);
        assert_eq!(progress.remaining_secs(exercise, t1), 90);
    }

    #[test]
    fn advancing_past_last_step_completes() {
        let exercise = &ReflectionExercise::builtin()[1];
        let now = Utc::now();
        let mut progress = ExerciseProgress::new(exercise, now);

        progress.advance(Some("  ".into()), now);
        progress.advance(None, now);
        assert!(progress.advance(Some("max loss 500".into()), now));
        assert!(progress.completed);
        assert_eq!(progress.current_step, 3);
        assert_eq!(progress.reflections, vec!["max loss 500".to_string()]);
        assert_eq!(progress.remaining_secs(exercise, now), 0);
    }
}
