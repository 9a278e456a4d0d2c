use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::FormData;
use crate::spec::field::{FieldDescriptor, FieldType};
use crate::spec::form::FormConfiguration;
use crate::spec::step::StepDescriptor;
use crate::text::ErrorMessages;
use crate::translate::{Params, Translator};

/// Required fields of `step` whose value is absent, falsy or an empty list,
/// in declaration order. Fields of other steps are never consulted.
pub fn missing_required<'a>(step: &'a StepDescriptor, data: &FormData) -> Vec<&'a FieldDescriptor> {
    step.required_fields()
        .filter(|field| data.get(&field.name).is_none_or(|value| value.is_missing()))
        .collect()
}

/// Submission blocked because required fields of the active step are empty.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct MissingFields {
    pub step_id: String,
    /// Field names, declaration order.
    pub fields: Vec<String>,
    /// Translated labels, same order as `fields`.
    pub labels: Vec<String>,
    /// Translated message naming every missing field.
    pub message: String,
}

impl MissingFields {
    pub fn new<T: Translator + ?Sized>(
        step: &StepDescriptor,
        missing: &[&FieldDescriptor],
        translator: &T,
        messages: &ErrorMessages,
    ) -> Self {
        let labels: Vec<String> = missing
            .iter()
            .map(|field| translator.t(&field.label))
            .collect();
        let mut params = Params::new();
        params.insert("fields".into(), labels.join(", "));
        let message = translator.translate(&messages.required_fields_missing, Some(&params));

        Self {
            step_id: step.id.clone(),
            fields: missing.iter().map(|field| field.name.clone()).collect(),
            labels,
            message,
        }
    }
}

/// Problem found by [`check_config`]. Rendering tolerates all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

impl ConfigIssue {
    fn form(code: &str, message: impl Into<String>) -> Self {
        Self {
            step_id: None,
            field: None,
            code: code.into(),
            message: message.into(),
        }
    }

    fn step(step: &StepDescriptor, code: &str, message: impl Into<String>) -> Self {
        Self {
            step_id: Some(step.id.clone()),
            ..Self::form(code, message)
        }
    }

    fn field(
        step: &StepDescriptor,
        field: &FieldDescriptor,
        code: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: Some(field.name.clone()),
            ..Self::step(step, code, message)
        }
    }
}

/// Lints a configuration: missing steps, empty steps, duplicate ids and
/// names, selects without options, unknown field types and misplaced hints.
pub fn check_config(config: &FormConfiguration) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if config.steps.is_empty() {
        issues.push(ConfigIssue::form("no_steps", "form declares no steps"));
    }

    let mut step_ids = BTreeSet::new();
    for step in &config.steps {
        if !step_ids.insert(step.id.as_str()) {
            issues.push(ConfigIssue::step(
                step,
                "duplicate_step_id",
                format!("step id '{}' is used more than once", step.id),
            ));
        }
        if step.fields.is_empty() {
            issues.push(ConfigIssue::step(step, "empty_step", "step has no fields"));
        }

        let mut names = BTreeSet::new();
        for field in &step.fields {
            if !names.insert(field.name.as_str()) {
                issues.push(ConfigIssue::field(
                    step,
                    field,
                    "duplicate_field",
                    format!("field name '{}' repeats within the step", field.name),
                ));
            }
            match &field.kind {
                FieldType::Select if field.options().is_empty() => {
                    issues.push(ConfigIssue::field(
                        step,
                        field,
                        "missing_options",
                        "select field declares no options",
                    ));
                }
                FieldType::Other(kind) => {
                    issues.push(ConfigIssue::field(
                        step,
                        field,
                        "unknown_type",
                        format!("field type '{kind}' is not rendered"),
                    ));
                }
                _ => {}
            }
            if field.rows.is_some() && field.kind != FieldType::Textarea {
                issues.push(ConfigIssue::field(
                    step,
                    field,
                    "rows_ignored",
                    format!("rows only applies to textarea, not {}", field.kind),
                ));
            }
        }
    }

    for issue in &issues {
        tracing::warn!(
            form = %config.id,
            code = %issue.code,
            step = issue.step_id.as_deref().unwrap_or("-"),
            field = issue.field.as_deref().unwrap_or("-"),
            "{}",
            issue.message
        );
    }

    issues
}
