//! API endpoint implementations.

mod executions;
mod flows;

pub use executions::ExecutionsApi;
pub use flows::{FlowDefinition, FlowsApi};
