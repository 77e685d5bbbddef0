//! Run lifecycle: describe the flow, validate inputs, submit, track, collect.
//!
//! Each stage feeds the next and the first error ends the run. Nothing is
//! retried.

use crate::api::FlowDefinition;
use crate::client::OoClient;
use crate::error::{Error, Result};
use crate::tracker::{ExecutionTracker, PollPolicy, Sleeper, ThreadSleeper, TrackOutcome};
use crate::types::{ExecutionLog, FlowDescriptor, InputSet, RunHandle, RunSubmission};
use crate::validate::validate_inputs;

/// A submitted run.
#[derive(Debug, Clone)]
pub struct StartedRun {
    pub flow: FlowDescriptor,
    pub handle: RunHandle,
}

/// Final state of a tracked run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub handle: RunHandle,
    pub outcome: TrackOutcome,
    pub log: ExecutionLog,
}

impl RunReport {
    pub fn is_resolved(&self) -> bool {
        self.outcome.is_resolved()
    }

    /// Turn anything but a resolved run into an error.
    pub fn ensure_resolved(&self) -> Result<()> {
        match &self.outcome {
            outcome if outcome.is_resolved() => Ok(()),
            TrackOutcome::Expired { polls } => Err(Error::TimeoutExpired {
                run_id: self.handle.to_string(),
                polls: *polls,
            }),
            outcome => Err(Error::Unresolved {
                run_id: self.handle.to_string(),
                status: outcome.status_label().unwrap_or_default(),
            }),
        }
    }
}

/// Drives one flow run against a server.
pub struct FlowRunner {
    client: OoClient,
    policy: PollPolicy,
    sleeper: Box<dyn Sleeper>,
}

impl FlowRunner {
    /// Create a runner with the default poll policy, sleeping the thread
    /// between status checks.
    pub fn new(client: OoClient) -> Self {
        Self {
            client,
            policy: PollPolicy::default(),
            sleeper: Box::new(ThreadSleeper),
        }
    }

    /// Set the timeout and heartbeat.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace how the runner waits between status checks.
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Describe the flow, validate the inputs and submit the run.
    ///
    /// Validation happens before the submission is sent, so a missing input
    /// never starts a run.
    pub fn start(&self, flow_id: &str, inputs: InputSet) -> Result<StartedRun> {
        let FlowDefinition { descriptor, schema } = self.client.flows().describe(flow_id)?;
        validate_inputs(&schema, &inputs)?;

        let submission = RunSubmission::new(flow_id, &descriptor, inputs);
        let handle = self.client.executions().submit(&submission)?;

        Ok(StartedRun {
            flow: descriptor,
            handle,
        })
    }

    /// Track a submitted run and collect its execution log.
    ///
    /// The log is fetched whether the run finished or the budget expired, so
    /// the caller always has the execution summary to report.
    pub fn wait(&self, handle: RunHandle) -> Result<RunReport> {
        let executions = self.client.executions();
        let outcome =
            ExecutionTracker::new(&executions, self.policy, self.sleeper.as_ref()).track(&handle)?;
        let log = executions.execution_log(&handle)?;

        Ok(RunReport {
            handle,
            outcome,
            log,
        })
    }

    /// Start a run and wait for it.
    pub fn run(&self, flow_id: &str, inputs: InputSet) -> Result<RunReport> {
        let started = self.start(flow_id, inputs)?;
        self.wait(started.handle)
    }
}
