use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Quiet period before a search term is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds at most one pending value; scheduling again replaces the value and
/// restarts the timer.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolves with the pending value once its quiet period has passed.
    /// Never resolves while nothing is pending. Cancel safe.
    pub async fn settled(&mut self) -> T {
        loop {
            let Some((_, deadline)) = &self.pending else {
                return std::future::pending().await;
            };
            sleep_until(*deadline).await;
            if let Some((value, _)) = self.pending.take() {
                return value;
            }
        }
    }
}
