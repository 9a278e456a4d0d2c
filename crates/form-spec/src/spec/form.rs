use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::step::StepDescriptor;

/// Top-level form definition.
///
/// `id` and `template_name` are opaque to the engine. The configuration is
/// read-only for the lifetime of a session and may be shared between renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormConfiguration {
    pub id: String,
    pub template_name: String,
    pub steps: Vec<StepDescriptor>,
}

impl FormConfiguration {
    pub fn step(&self, index: usize) -> Option<&StepDescriptor> {
        self.steps.get(index)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step_index(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == id)
    }
}
