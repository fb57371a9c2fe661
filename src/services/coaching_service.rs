use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::models::coaching::CoachingMessage;

pub const DEFAULT_DISMISS_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Default)]
struct OverlayState {
    current: Option<CoachingMessage>,
    pending: Option<CancellationToken>,
}

/// Transient coaching message with at most one scheduled dismissal.
///
/// Showing a message cancels the dismissal of the previous one, so a
/// stale timer can never clear a newer message.
#[derive(Debug, Clone)]
pub struct CoachingOverlay {
    delay: Duration,
    state: Arc<Mutex<OverlayState>>,
}

impl Default for CoachingOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_DELAY)
    }
}

impl CoachingOverlay {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(OverlayState::default())),
        }
    }

    pub fn current(&self) -> Option<CoachingMessage> {
        self.lock().current.clone()
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: CoachingMessage) {
        let token = CancellationToken::new();
        {
            let mut state = self.lock();
            if let Some(previous) = state.pending.replace(token.clone()) {
                previous.cancel();
            }
            tracing::debug!(key = %message.key, "Showing coaching message");
            state.current = Some(message);
        }

        let state = Arc::clone(&self.state);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let mut state = state.lock().expect("coaching overlay mutex poisoned");
                    // show() cancels under this lock, so an uncancelled token
                    // still owns the current message.
                    if !token.is_cancelled() {
                        state.current = None;
                        state.pending = None;
                    }
                }
            }
        });
    }

    pub fn dismiss(&self) {
        let mut state = self.lock();
        if let Some(pending) = state.pending.take() {
            pending.cancel();
        }
        state.current = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, OverlayState> {
        self.state.lock().expect("coaching overlay mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::coaching::CoachingTrigger;

    fn milestone(answered: usize) -> CoachingMessage {
        CoachingMessage::for_trigger(CoachingTrigger::Milestone { answered })
    }

    #[tokio::test(start_paused = true)]
    async fn message_is_dismissed_after_delay() {
        let overlay = CoachingOverlay::new(Duration::from_millis(2500));
        overlay.show(milestone(5));
        assert!(overlay.current().is_some());

        tokio::time::sleep(Duration::from_millis(2400)).await;
        assert!(overlay.current().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(overlay.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn new_message_cancels_previous_dismissal() {
        let overlay = CoachingOverlay::new(Duration::from_millis(2500));
        overlay.show(milestone(5));

        tokio::time::sleep(Duration::from_millis(2000)).await;
        overlay.show(milestone(10));

        // First message's deadline passes; the second must survive it.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let current = overlay.current().expect("second message still shown");
        assert_eq!(
            current.trigger,
            CoachingTrigger::Milestone { answered: 10 }
        );

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(overlay.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_clears_immediately() {
        let overlay = CoachingOverlay::default();
        overlay.show(milestone(5));
        overlay.dismiss();
        assert!(overlay.current().is_none());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(overlay.current().is_none());
    }
}
