use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::FieldDescriptor;

/// A titled group of fields shown together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StepDescriptor {
    pub id: String,
    /// Translation key.
    pub title: String,
    /// Translation key.
    #[serde(default)]
    pub description: String,
    /// Render and tab order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl StepDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.required)
    }
}
