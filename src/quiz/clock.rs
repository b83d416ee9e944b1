use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::Notify;
use tokio::time::Instant;

// roughly thirty years, used when the requested limit overflows `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

#[derive(Debug, Default)]
struct Expiry {
    expired: AtomicBool,
    notify: Notify,
}

impl Expiry {
    fn fire(&self) {
        self.expired.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }
}

/// Countdown for the whole session. Once it fires it stays fired, so a
/// question that starts waiting after the deadline still sees the expiry.
#[derive(Debug, Clone)]
pub struct QuizClock {
    deadline: Instant,
    expiry: Arc<Expiry>,
}

impl QuizClock {
    /// Arms the countdown. Must be called from inside a tokio runtime unless
    /// `limit` is zero, in which case the clock is expired on return.
    pub fn start(limit: Duration) -> Self {
        let now = Instant::now();
        let deadline = now.checked_add(limit).unwrap_or_else(|| now + FAR_FUTURE);
        let expiry = Arc::new(Expiry::default());

        if limit.is_zero() {
            expiry.fire();
        } else {
            let expiry = expiry.clone();
            tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                debug!("Time limit reached");
                expiry.fire();
            });
        }

        Self { deadline, expiry }
    }

    pub fn is_expired(&self) -> bool {
        self.expiry.expired.load(Ordering::SeqCst)
    }

    pub fn remaining(&self) -> Duration {
        if self.is_expired() {
            return Duration::ZERO;
        }
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Resolves once the time limit has elapsed, immediately if it already has.
    /// Waiting does not consume the expiry.
    pub async fn expired(&self) {
        loop {
            let notified = self.expiry.notify.notified();
            tokio::pin!(notified);
            // register before checking the flag so a fire in between is not lost
            notified.as_mut().enable();

            if self.is_expired() {
                return;
            }
            notified.await;
        }
    }
}
