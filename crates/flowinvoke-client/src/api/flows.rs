//! Flows API.

use crate::client::{OoClient, decode};
use crate::error::Result;
use crate::types::{FlowDescriptor, InputSchema};

/// A flow together with its declared inputs.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    pub descriptor: FlowDescriptor,
    pub schema: InputSchema,
}

/// Flows API client.
pub struct FlowsApi {
    client: OoClient,
}

impl FlowsApi {
    pub(crate) fn new(client: OoClient) -> Self {
        Self { client }
    }

    /// Get flow metadata.
    pub fn get(&self, id: &str) -> Result<FlowDescriptor> {
        self.client.get(&format!("flows/{}", id))
    }

    /// Get the declared inputs of a flow.
    ///
    /// Flows without inputs may answer with an empty body.
    pub fn inputs(&self, id: &str) -> Result<InputSchema> {
        let path = format!("flows/{}/inputs", id);
        let body = self.client.get_text(&path)?;
        if body.trim().is_empty() {
            return Ok(InputSchema::new());
        }
        decode(&path, &body)
    }

    /// Fetch metadata and inputs. Either failing aborts the whole call.
    pub fn describe(&self, id: &str) -> Result<FlowDefinition> {
        tracing::info!(flow_id = id, "fetching flow definition");
        let descriptor = self.get(id)?;
        let schema = self.inputs(id)?;
        tracing::debug!(
            flow_id = id,
            name = %descriptor.name,
            inputs = schema.len(),
            "fetched flow definition"
        );
        Ok(FlowDefinition { descriptor, schema })
    }
}
