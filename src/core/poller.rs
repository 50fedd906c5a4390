//! Readiness polling
//!
//! The external renderer initializes lazily, so callers wait for it before
//! asking it to typeset. The wait is bounded: after the configured number of
//! attempts the poller gives up and lets the caller proceed anyway. A renderer
//! that never loads must not block the page.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::data::constants::{MAX_POLL_ATTEMPTS, POLL_INTERVAL_MS};

/// Polling schedule
///
/// Deserializes from `interval_ms` and `max_attempts`, both optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "PollSettings")]
pub struct PollConfig {
    /// Delay after each failed check
    pub interval: Duration,
    /// Number of failed checks before giving up
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(POLL_INTERVAL_MS),
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// On-disk form of [`PollConfig`]
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PollSettings {
    interval_ms: u64,
    max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: POLL_INTERVAL_MS,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

impl From<PollSettings> for PollConfig {
    fn from(settings: PollSettings) -> Self {
        Self {
            interval: Duration::from_millis(settings.interval_ms),
            max_attempts: settings.max_attempts,
        }
    }
}

impl PollConfig {
    /// Longest time [`await_ready`] can take with this schedule
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts.max(1)
    }
}

/// How a wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The predicate held on attempt `attempts`
    Ready { attempts: u32 },
    /// Every attempt failed; the caller proceeds regardless
    Exhausted { attempts: u32 },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Readiness::Ready { attempts } | Readiness::Exhausted { attempts } => *attempts,
        }
    }
}

/// Wait until `is_ready` holds or the attempt budget runs out.
///
/// Ready on attempt `k` means exactly `k - 1` delays were slept. When the
/// predicate never holds, exactly `max_attempts` delays are slept before
/// returning [`Readiness::Exhausted`]. Each call keeps its own counter, so
/// concurrent waits do not interfere.
pub async fn await_ready<F>(mut is_ready: F, config: &PollConfig) -> Readiness
where
    F: FnMut() -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;
        if is_ready() {
            if attempts > 1 {
                debug!(attempts, "renderer ready");
            }
            return Readiness::Ready { attempts };
        }

        tokio::time::sleep(config.interval).await;

        if attempts >= max_attempts {
            warn!(
                attempts,
                waited_ms = config.budget().as_millis() as u64,
                "renderer not ready, proceeding anyway"
            );
            return Readiness::Exhausted { attempts };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn assert_slept(start: Instant, delays: u32) {
        let expected = Duration::from_millis(POLL_INTERVAL_MS) * delays;
        let elapsed = start.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(50),
            "expected {:?}, slept {:?}",
            expected,
            elapsed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_immediately() {
        let start = Instant::now();
        let readiness = await_ready(|| true, &PollConfig::default()).await;
        assert_eq!(readiness, Readiness::Ready { attempts: 1 });
        assert_slept(start, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_kth_attempt() {
        for k in [2u32, 7, 20] {
            let mut calls = 0;
            let start = Instant::now();
            let readiness = await_ready(
                || {
                    calls += 1;
                    calls == k
                },
                &PollConfig::default(),
            )
            .await;
            assert_eq!(readiness, Readiness::Ready { attempts: k });
            assert_slept(start, k - 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_ready_is_bounded() {
        let mut calls = 0;
        let start = Instant::now();
        let readiness = await_ready(
            || {
                calls += 1;
                false
            },
            &PollConfig::default(),
        )
        .await;
        assert_eq!(readiness, Readiness::Exhausted { attempts: 20 });
        assert!(!readiness.is_ready());
        assert_eq!(calls, 20);
        assert_slept(start, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_schedule() {
        let config = PollConfig {
            interval: Duration::from_millis(10),
            max_attempts: 3,
        };
        let start = Instant::now();
        let readiness = await_ready(|| false, &config).await;
        assert_eq!(readiness.attempts(), 3);
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(config.budget(), Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_waits_keep_own_counters() {
        let config = PollConfig::default();
        let mut a = 0;
        let mut b = 0;
        let (first, second) = tokio::join!(
            await_ready(
                || {
                    a += 1;
                    a == 3
                },
                &config
            ),
            await_ready(
                || {
                    b += 1;
                    b == 5
                },
                &config
            ),
        );
        assert_eq!(first, Readiness::Ready { attempts: 3 });
        assert_eq!(second, Readiness::Ready { attempts: 5 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_treated_as_one() {
        let config = PollConfig {
            interval: Duration::from_millis(250),
            max_attempts: 0,
        };
        let readiness = await_ready(|| false, &config).await;
        assert_eq!(readiness, Readiness::Exhausted { attempts: 1 });
    }
}
