//! Execution tracking: poll a run until it leaves `RUNNING` or the budget
//! runs out.
//!
//! The budget is a number of status checks, `round(timeout / heartbeat)`,
//! not a wall-clock deadline. Slow requests therefore stretch the real
//! elapsed time beyond `timeout`.

use std::time::Duration;

use crate::api::ExecutionsApi;
use crate::error::{Error, Result};
use crate::types::{ResultStatus, RunHandle, RunStatus, StatusSummary};

/// Default time to wait for a run to finish.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Default interval between status checks.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(120);

/// Suspends the caller between status checks.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Source of run status, one summary per call.
pub trait StatusSource {
    fn status(&self, run: &RunHandle) -> Result<StatusSummary>;
}

impl StatusSource for ExecutionsApi {
    fn status(&self, run: &RunHandle) -> Result<StatusSummary> {
        ExecutionsApi::status(self, run)
    }
}

/// Timeout and heartbeat for tracking a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    timeout: Duration,
    heartbeat: Duration,
}

impl PollPolicy {
    /// Create a policy. The heartbeat must be non-zero.
    pub fn new(timeout: Duration, heartbeat: Duration) -> Result<Self> {
        if heartbeat.is_zero() {
            return Err(Error::Config("heartbeat must be greater than zero".to_string()));
        }
        Ok(Self { timeout, heartbeat })
    }

    /// Create a policy from whole seconds.
    pub fn from_secs(timeout: u64, heartbeat: u64) -> Result<Self> {
        Self::new(Duration::from_secs(timeout), Duration::from_secs(heartbeat))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn heartbeat(&self) -> Duration {
        self.heartbeat
    }

    /// Maximum number of status checks, `round(timeout / heartbeat)`.
    pub fn budget(&self) -> u64 {
        (self.timeout.as_secs_f64() / self.heartbeat.as_secs_f64()).round() as u64
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            heartbeat: DEFAULT_HEARTBEAT,
        }
    }
}

/// How tracking ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Server reported a status other than `RUNNING`.
    Terminal {
        status: RunStatus,
        result: Option<ResultStatus>,
    },
    /// Budget exhausted while the run was still `RUNNING`.
    Expired { polls: u64 },
}

impl TrackOutcome {
    /// True only for a terminal `RESOLVED` result.
    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            TrackOutcome::Terminal {
                result: Some(result),
                ..
            } if result.is_resolved()
        )
    }

    /// Status to report to the user, if the server gave one.
    ///
    /// The result type when present, otherwise the lifecycle status.
    pub fn status_label(&self) -> Option<String> {
        match self {
            TrackOutcome::Terminal {
                result: Some(result),
                ..
            } => Some(result.to_string()),
            TrackOutcome::Terminal { status, .. } => Some(status.to_string()),
            TrackOutcome::Expired { .. } => None,
        }
    }
}

/// Polls a run on a fixed heartbeat.
pub struct ExecutionTracker<'a> {
    source: &'a dyn StatusSource,
    policy: PollPolicy,
    sleeper: &'a dyn Sleeper,
}

impl<'a> ExecutionTracker<'a> {
    pub fn new(source: &'a dyn StatusSource, policy: PollPolicy, sleeper: &'a dyn Sleeper) -> Self {
        Self {
            source,
            policy,
            sleeper,
        }
    }

    /// Poll until the run leaves `RUNNING` or the budget is spent.
    ///
    /// Returns on the first non-running status. A failed status request
    /// ends tracking with that error.
    pub fn track(&self, run: &RunHandle) -> Result<TrackOutcome> {
        let budget = self.policy.budget();
        tracing::info!(
            run_id = %run,
            budget,
            heartbeat_secs = self.policy.heartbeat.as_secs(),
            "tracking run"
        );

        let mut remaining = budget;
        let mut polls = 0;
        while remaining > 0 {
            let summary = self.source.status(run)?;
            polls += 1;

            if !summary.status.is_running() {
                tracing::info!(
                    run_id = %run,
                    polls,
                    status = %summary.status,
                    result = ?summary.result_status_type,
                    "run finished"
                );
                return Ok(TrackOutcome::Terminal {
                    status: summary.status,
                    result: summary.result_status_type,
                });
            }

            tracing::debug!(run_id = %run, poll = polls, remaining, "run still running");
            self.sleeper.sleep(self.policy.heartbeat);
            remaining -= 1;
        }

        tracing::warn!(run_id = %run, polls, "polling budget exhausted");
        Ok(TrackOutcome::Expired { polls })
    }
}
