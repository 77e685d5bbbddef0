//! Input validation against a flow's declared inputs.

use crate::error::{Error, Result};
use crate::types::{InputSchemaEntry, InputSet};

/// Check that every mandatory input is bound.
///
/// Entries are scanned in declared order and the first missing mandatory
/// input is reported. Inputs the schema does not declare are allowed.
pub fn validate_inputs(schema: &[InputSchemaEntry], inputs: &InputSet) -> Result<()> {
    match schema
        .iter()
        .find(|entry| entry.mandatory && !inputs.contains_key(&entry.name))
    {
        Some(entry) => Err(Error::MissingInput {
            name: entry.name.clone(),
        }),
        None => Ok(()),
    }
}
