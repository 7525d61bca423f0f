// src/copy_state.rs
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

/// The "Copied!" flag of one copy affordance, with its own reset timer.
///
/// Acknowledging again before the timer fires cancels the pending reset and
/// starts a fresh delay. Dropping the state cancels any pending reset.
pub struct CopyState {
    acknowledged: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
    reset_after: Duration,
    timer: Option<JoinHandle<()>>,
}

impl CopyState {
    pub fn new(reset_after: Duration) -> Self {
        Self {
            acknowledged: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
            reset_after,
            timer: None,
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::SeqCst)
    }

    /// Sets the flag and (re)arms the reset timer. Must run inside a tokio runtime.
    pub fn acknowledge(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        // A timer that already woke up but lost the race with abort() checks
        // the generation before clearing the flag.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.acknowledged.store(true, Ordering::SeqCst);

        let acknowledged = Arc::clone(&self.acknowledged);
        let current = Arc::clone(&self.generation);
        let deadline = tokio::time::Instant::now() + self.reset_after;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if current.load(Ordering::SeqCst) == generation {
                acknowledged.store(false, Ordering::SeqCst);
            }
        }));
    }
}

impl Drop for CopyState {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    const DELAY: Duration = Duration::from_millis(2000);

    #[tokio::test(start_paused = true)]
    async fn test_acknowledge_then_reset() {
        let mut state = CopyState::new(DELAY);
        assert!(!state.is_acknowledged());

        state.acknowledge();
        assert!(state.is_acknowledged());

        sleep(Duration::from_millis(1999)).await;
        assert!(state.is_acknowledged());

        sleep(Duration::from_millis(2)).await;
        assert!(!state.is_acknowledged());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_acknowledge_restarts_window() {
        let mut state = CopyState::new(DELAY);

        state.acknowledge();
        sleep(Duration::from_millis(1500)).await;
        assert!(state.is_acknowledged());

        state.acknowledge();
        sleep(Duration::from_millis(1500)).await;
        // 3000ms since the first copy, 1500ms since the second.
        assert!(state.is_acknowledged());

        sleep(Duration::from_millis(600)).await;
        assert!(!state.is_acknowledged());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let mut state = CopyState::new(DELAY);
        state.acknowledge();
        let flag = Arc::clone(&state.acknowledged);

        drop(state);
        sleep(DELAY * 2).await;

        // The aborted timer never ran, so the orphaned flag is untouched.
        assert!(flag.load(Ordering::SeqCst));
    }
}
