//! Exponential backoff executor.
//!
//! # Delay formula
//!
//! For zero-based attempt index `n`:
//! ```text
//! delay(0) = 0
//! delay(n) = min(max_delay, min_delay * 2^n)      n >= 1
//! ```
//! There is no jitter. With `min_delay = 10ms, max_delay = 100ms` the pauses
//! before attempts 1, 2, 3, 4 are 20ms, 40ms, 80ms, 100ms.
//!
//! # Success classification
//!
//! An attempt succeeds when the transport returns a response whose status is
//! in `200..=398`. Everything else, including transport errors, is recorded
//! and retried until the budget runs out.

use super::{PreparedRequest, Response, Transport};
use crate::error::{AggregatedFailure, AttemptError, HttpStatusError};
use crate::observability::{AttemptObserver, AttemptOutcome, AttemptRecord, RequestTimer};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

/// Status codes the executor treats as success.
///
/// Success through redirect, stopping one short of 399.
pub const ACCEPTED_STATUS: RangeInclusive<u16> = 200..=398;

/// Whether the executor accepts a status code as success.
pub fn is_accepted_status(status: u16) -> bool {
    ACCEPTED_STATUS.contains(&status)
}

/// Retry budget and delay bounds.
///
/// A budget of 0 or 1 means a single attempt with no delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Total attempts allowed (not retries)
    pub max_attempts: u32,
    /// Base delay that is doubled per attempt
    pub min_delay: Duration,
    /// Ceiling for any single delay
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    /// Defaults:
    /// - `max_attempts`: 3
    /// - `min_delay`: 100ms
    /// - `max_delay`: 2s
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl BackoffPolicy {
    /// Create a policy.
    pub fn new(max_attempts: u32, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            min_delay,
            max_delay,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Attempts that will actually run; never less than one.
    pub fn attempt_budget(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to sleep before the given zero-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.min_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
            .min(self.max_delay)
    }

    /// Sum of every delay a fully failing run would sleep.
    pub fn total_delay(&self) -> Duration {
        (1..self.attempt_budget())
            .map(|attempt| self.delay_for(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Runs one logical request under a [`BackoffPolicy`].
#[derive(Clone)]
pub struct BackoffExecutor {
    transport: Arc<dyn Transport>,
    observer: Arc<dyn AttemptObserver>,
    policy: BackoffPolicy,
}

impl std::fmt::Debug for BackoffExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackoffExecutor")
            .field("transport", &self.transport)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl BackoffExecutor {
    /// Create an executor.
    pub fn new(
        transport: Arc<dyn Transport>,
        observer: Arc<dyn AttemptObserver>,
        policy: BackoffPolicy,
    ) -> Self {
        Self {
            transport,
            observer,
            policy,
        }
    }

    /// The policy this executor applies.
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Send the request, retrying until a response in [`ACCEPTED_STATUS`]
    /// arrives or the attempt budget is spent.
    ///
    /// Retrying a create or send after a transport error can duplicate the
    /// remote side effect; the service gives no idempotency guarantee.
    ///
    /// # Errors
    ///
    /// Returns an [`AggregatedFailure`] with one entry per attempt, in order,
    /// when no attempt succeeds.
    pub async fn execute(
        &self,
        request: &PreparedRequest,
    ) -> std::result::Result<Response, AggregatedFailure> {
        let budget = self.policy.attempt_budget();
        let mut failures = AggregatedFailure::new();

        for attempt in 0..budget {
            let delay = self.policy.delay_for(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let timer = RequestTimer::start();
            let result = self.transport.send(request).await;
            let latency = timer.elapsed();

            let (outcome, succeeded) = match &result {
                Ok(resp) => {
                    let status = resp.status.as_u16();
                    (AttemptOutcome::Status(status), is_accepted_status(status))
                }
                Err(err) => (AttemptOutcome::TransportError(format!("{:#}", err)), false),
            };

            self.observer.on_attempt(&AttemptRecord {
                attempt,
                delay,
                latency,
                method: request.method().clone(),
                url: request.url().clone(),
                outcome,
                succeeded,
            });

            match result {
                Ok(resp) if succeeded => {
                    return Ok(Response::new(
                        resp.status,
                        resp.headers,
                        resp.body,
                        attempt + 1,
                        latency,
                    ));
                }
                Ok(resp) => failures.push(AttemptError::Status(HttpStatusError {
                    attempt,
                    status: resp.status.as_u16(),
                    body: String::from_utf8_lossy(&resp.body).into_owned(),
                    latency,
                })),
                Err(err) => failures.push(AttemptError::Transport {
                    attempt,
                    message: format!("{:#}", err),
                    latency,
                }),
            }
        }

        Err(failures)
    }
}
