//! Client for running flows on an Operations Orchestration server.
//!
//! This crate provides a typed, blocking client for the `/oo/rest/v1` API and
//! the run lifecycle built on it.
//!
//! # Example
//!
//! ```no_run
//! use flowinvoke_client::{Credentials, FlowRunner, InputSet, OoClient, PollPolicy, Result};
//!
//! # fn example() -> Result<()> {
//! let client = OoClient::builder()
//!     .host("oo.example.com:8443")
//!     .credentials(Credentials::basic("admin", "admin"))
//!     .build()?;
//!
//! let mut inputs = InputSet::new();
//! inputs.insert("targetHost".to_string(), "web01".to_string());
//!
//! let report = FlowRunner::new(client)
//!     .with_policy(PollPolicy::from_secs(600, 30)?)
//!     .run("2f0e1c4a-0000-4000-8000-000000000001", inputs)?;
//!
//! for (name, value) in report.log.outputs() {
//!     println!("{}={}", name, value);
//! }
//! report.ensure_resolved()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//!
//! 1. **Describe**: fetch the flow and its declared inputs ([`FlowsApi::describe`])
//! 2. **Validate**: check mandatory inputs are bound ([`validate_inputs`])
//! 3. **Submit**: start the run ([`ExecutionsApi::submit`])
//! 4. **Track**: poll status on a heartbeat ([`ExecutionTracker`]), then fetch the execution log

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod runner;
pub mod tracker;
pub mod types;
pub mod validate;

pub use api::{ExecutionsApi, FlowDefinition, FlowsApi};
pub use auth::Credentials;
pub use client::{ClientBuilder, OoClient};
pub use error::{Error, Result};
pub use runner::{FlowRunner, RunReport, StartedRun};
pub use tracker::{
    ExecutionTracker, PollPolicy, Sleeper, StatusSource, ThreadSleeper, TrackOutcome,
};
pub use types::*;
pub use validate::validate_inputs;
