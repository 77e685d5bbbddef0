//! Request and response types for the Operations Orchestration REST API.
//!
//! These types mirror the server's `/oo/rest/v1` contract. Status values the
//! client does not know are kept verbatim rather than rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Caller-supplied flow inputs, keyed by input name.
pub type InputSet = BTreeMap<String, String>;

// ─────────────────────────────────────────────────────────────────────────────
// Flows
// ─────────────────────────────────────────────────────────────────────────────

/// Flow metadata returned by `GET flows/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDescriptor {
    /// Server-assigned flow identifier.
    pub id: String,
    /// Display name, used as the run name.
    pub name: String,
    /// Library path of the flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One declared flow input returned by `GET flows/{id}/inputs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSchemaEntry {
    /// Input name.
    pub name: String,
    /// Whether the server requires this input to be bound.
    #[serde(default)]
    pub mandatory: bool,
    /// Whether the input value is stored encrypted.
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Declared inputs of a flow, in server order.
pub type InputSchema = Vec<InputSchemaEntry>;

// ─────────────────────────────────────────────────────────────────────────────
// Executions
// ─────────────────────────────────────────────────────────────────────────────

/// Server-side log level for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Standard,
    Error,
}

/// Body of `POST executions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSubmission {
    /// Flow identifier.
    pub uuid: String,
    /// Name shown for the run on the server.
    pub run_name: String,
    /// Server-side log level.
    pub log_level: LogLevel,
    /// Input bindings.
    pub inputs: InputSet,
}

impl RunSubmission {
    /// Build a submission for a flow.
    ///
    /// `flow_id` is the identifier the caller asked for and is sent as given.
    /// The run is named after the flow and always logs at `DEBUG` so the
    /// execution log fetched afterwards carries full detail.
    pub fn new(flow_id: impl Into<String>, flow: &FlowDescriptor, inputs: InputSet) -> Self {
        Self {
            uuid: flow_id.into(),
            run_name: flow.name.clone(),
            log_level: LogLevel::Debug,
            inputs,
        }
    }
}

/// Response to `POST executions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    /// Identifier of the started run.
    pub execution_id: String,
    /// Server error code, `NO_ERROR` on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

/// Error code the server reports for an accepted submission.
pub const NO_ERROR: &str = "NO_ERROR";

/// Opaque identifier of a started run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunHandle(String);

impl RunHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Running,
    Completed,
    SystemFailure,
    Paused,
    PendingPause,
    Canceled,
    PendingCancel,
    /// Any status this client does not know about.
    Other(String),
}

impl RunStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Running => "RUNNING",
            RunStatus::Completed => "COMPLETED",
            RunStatus::SystemFailure => "SYSTEM_FAILURE",
            RunStatus::Paused => "PAUSED",
            RunStatus::PendingPause => "PENDING_PAUSE",
            RunStatus::Canceled => "CANCELED",
            RunStatus::PendingCancel => "PENDING_CANCEL",
            RunStatus::Other(s) => s,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RunStatus::Running)
    }
}

impl From<String> for RunStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "RUNNING" => RunStatus::Running,
            "COMPLETED" => RunStatus::Completed,
            "SYSTEM_FAILURE" => RunStatus::SystemFailure,
            "PAUSED" => RunStatus::Paused,
            "PENDING_PAUSE" => RunStatus::PendingPause,
            "CANCELED" => RunStatus::Canceled,
            "PENDING_CANCEL" => RunStatus::PendingCancel,
            _ => RunStatus::Other(s),
        }
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result classification of a finished run (`resultStatusType`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultStatus {
    Resolved,
    Error,
    Diagnosed,
    NoActionTaken,
    /// Any result type this client does not know about.
    Other(String),
}

impl ResultStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ResultStatus::Resolved => "RESOLVED",
            ResultStatus::Error => "ERROR",
            ResultStatus::Diagnosed => "DIAGNOSED",
            ResultStatus::NoActionTaken => "NO_ACTION_TAKEN",
            ResultStatus::Other(s) => s,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResultStatus::Resolved)
    }
}

impl From<String> for ResultStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "RESOLVED" => ResultStatus::Resolved,
            "ERROR" => ResultStatus::Error,
            "DIAGNOSED" => ResultStatus::Diagnosed,
            "NO_ACTION_TAKEN" => ResultStatus::NoActionTaken,
            _ => ResultStatus::Other(s),
        }
    }
}

impl From<ResultStatus> for String {
    fn from(status: ResultStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of `GET executions/{id}/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    /// Lifecycle status.
    pub status: RunStatus,
    /// Result classification, set once the run has finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_status_type: Option<ResultStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_status_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_reason: Option<String>,
}

/// Response of `GET executions/{id}/execution-log`.
///
/// Fields other than the flow outputs and summary are kept in `extra` so the
/// whole log can be echoed back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLog {
    /// Flow outputs by name.
    #[serde(default)]
    pub flow_output: Option<BTreeMap<String, serde_json::Value>>,
    /// Server execution summary, opaque to the client.
    #[serde(default)]
    pub execution_summary: serde_json::Value,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ExecutionLog {
    /// Flow outputs in name order, empty when the server sent none.
    pub fn outputs(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.flow_output.iter().flat_map(|m| m.iter())
    }
}
