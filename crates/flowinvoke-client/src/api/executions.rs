//! Executions API.

use crate::client::OoClient;
use crate::error::{Error, Result};
use crate::types::{
    ExecutionLog, NO_ERROR, RunHandle, RunSubmission, StatusSummary, SubmissionResponse,
};

/// Executions API client.
pub struct ExecutionsApi {
    client: OoClient,
}

impl ExecutionsApi {
    pub(crate) fn new(client: OoClient) -> Self {
        Self { client }
    }

    /// Start a run.
    ///
    /// Sent exactly once; a failed submission is never retried since the
    /// server may already have started the run.
    pub fn submit(&self, submission: &RunSubmission) -> Result<RunHandle> {
        tracing::info!(
            flow_id = %submission.uuid,
            run_name = %submission.run_name,
            inputs = submission.inputs.len(),
            "submitting run"
        );
        let response: SubmissionResponse = self.client.post("executions", submission)?;

        if let Some(code) = response.error_code
            && code != NO_ERROR
        {
            return Err(Error::Rejected { code });
        }

        let handle = RunHandle::new(response.execution_id);
        tracing::info!(run_id = %handle, "run started");
        Ok(handle)
    }

    /// Get the current status of a run.
    pub fn status(&self, run: &RunHandle) -> Result<StatusSummary> {
        let summaries: Vec<StatusSummary> = self
            .client
            .get(&format!("executions/{}/summary", run))?;
        summaries.into_iter().next().ok_or_else(|| {
            Error::UnexpectedResponse(format!("empty status summary for execution {}", run))
        })
    }

    /// Get the execution log of a run.
    pub fn execution_log(&self, run: &RunHandle) -> Result<ExecutionLog> {
        tracing::info!(run_id = %run, "collecting execution log");
        self.client.get(&format!("executions/{}/execution-log", run))
    }
}
