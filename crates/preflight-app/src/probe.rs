//! Dependency-readiness probing with a bounded, fixed-delay retry loop.
//!
//! # Design
//! - One probe call is one connection/health round-trip; the retry loop is
//!   strictly sequential on the calling task. Nothing useful can happen in
//!   this process before the dependency check resolves, so the blocking wait
//!   is intentional.
//! - Exhaustion is a value, not an error: the caller decides whether to halt
//!   or start in degraded mode.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use thiserror::Error;
use tracing::{info, warn};

/// Failure detail from a single probe attempt.
#[derive(Debug, Error)]
#[error("{detail}")]
pub struct ProbeError {
    /// Human-readable failure description.
    pub detail: String,
}

/// Single-attempt health check against a required external dependency.
#[async_trait]
pub trait DependencyProbe: Send + Sync {
    /// Attempt one connection/health round-trip.
    async fn check(&self) -> Result<(), ProbeError>;
}

/// Production probe: open a Postgres connection and run a trivial query.
#[derive(Debug, Clone)]
pub struct PgProbe {
    url: String,
    connect_timeout: Duration,
}

impl PgProbe {
    /// Build a probe for `url`, bounding each attempt by `connect_timeout`.
    #[must_use]
    pub const fn new(url: String, connect_timeout: Duration) -> Self {
        Self {
            url,
            connect_timeout,
        }
    }
}

#[async_trait]
impl DependencyProbe for PgProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        let round_trip = async {
            let mut conn = PgConnection::connect(&self.url).await?;
            sqlx::query("SELECT 1").execute(&mut conn).await?;
            conn.close().await
        };
        match tokio::time::timeout(self.connect_timeout, round_trip).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(ProbeError {
                detail: err.to_string(),
            }),
            Err(_) => Err(ProbeError {
                detail: format!(
                    "connection attempt timed out after {}s",
                    self.connect_timeout.as_secs()
                ),
            }),
        }
    }
}

/// Outcome of the dependency-readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyStatus {
    /// A probe attempt succeeded.
    Ready {
        /// 1-based index of the successful attempt.
        attempts: u32,
    },
    /// Every attempt failed; the failure surfaces at first real use.
    Unavailable {
        /// Number of attempts performed.
        attempts: u32,
    },
    /// No dependency is configured for this run.
    Unconfigured,
}

impl DependencyStatus {
    /// Whether the dependency answered a probe during boot.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Call `probe` up to `max_attempts` times, strictly sequentially, with a
/// fixed `delay` between attempts (and none after the last). Returns on the
/// first success without a further probe call; exhaustion yields
/// [`DependencyStatus::Unavailable`] rather than an error.
pub async fn await_dependency(
    probe: &dyn DependencyProbe,
    max_attempts: u32,
    delay: Duration,
) -> DependencyStatus {
    for attempt in 1..=max_attempts {
        match probe.check().await {
            Ok(()) => {
                info!(attempt, "dependency probe succeeded");
                return DependencyStatus::Ready { attempts: attempt };
            }
            Err(err) => {
                warn!(attempt, max_attempts, error = %err, "dependency probe failed");
                if attempt < max_attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    DependencyStatus::Unavailable {
        attempts: max_attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedProbe {
        outcomes: Mutex<VecDeque<Result<(), ProbeError>>>,
        calls: AtomicU32,
    }

    impl ScriptedProbe {
        fn new(outcomes: impl IntoIterator<Item = Result<(), ProbeError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into_iter().collect()),
                calls: AtomicU32::new(0),
            }
        }

        fn failure() -> Result<(), ProbeError> {
            Err(ProbeError {
                detail: "connection refused".to_string(),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DependencyProbe for ScriptedProbe {
        async fn check(&self) -> Result<(), ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .expect("outcomes lock")
                .pop_front()
                .unwrap_or_else(Self::failure)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts_with_fixed_delay_between_them() {
        let probe = ScriptedProbe::new([]);
        let started = tokio::time::Instant::now();
        let status = await_dependency(&probe, 3, Duration::from_secs(2)).await;
        assert_eq!(status, DependencyStatus::Unavailable { attempts: 3 });
        assert_eq!(probe.calls(), 3);
        // Two inter-attempt delays; none after the final failure.
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn returns_on_first_success_without_further_calls() {
        let probe = ScriptedProbe::new([ScriptedProbe::failure(), Ok(())]);
        let status = await_dependency(&probe, 5, Duration::from_secs(2)).await;
        assert_eq!(status, DependencyStatus::Ready { attempts: 2 });
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_skips_the_delay() {
        let probe = ScriptedProbe::new([Ok(())]);
        let started = tokio::time::Instant::now();
        let status = await_dependency(&probe, 30, Duration::from_secs(2)).await;
        assert_eq!(status, DependencyStatus::Ready { attempts: 1 });
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[test]
    fn readiness_flag_matches_variants() {
        assert!(DependencyStatus::Ready { attempts: 1 }.is_ready());
        assert!(!DependencyStatus::Unavailable { attempts: 30 }.is_ready());
        assert!(!DependencyStatus::Unconfigured.is_ready());
    }
}
