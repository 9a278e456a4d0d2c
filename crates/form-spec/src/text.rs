use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Engine-owned strings: navigation labels, field markers and the error
/// template. Each entry is a translation key; with the basic adapter the key
/// is shown as is, which is why the defaults are plain English.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormText {
    #[serde(default)]
    pub button_texts: ButtonTexts,
    #[serde(default)]
    pub labels: FieldLabels,
    #[serde(default)]
    pub error_messages: ErrorMessages,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ButtonTexts {
    pub previous: String,
    pub next: String,
    pub submit: String,
    pub back: String,
}

impl Default for ButtonTexts {
    fn default() -> Self {
        Self {
            previous: "Previous".into(),
            next: "Next".into(),
            submit: "Submit".into(),
            back: "Back".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldLabels {
    pub optional: String,
    pub please_select: String,
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self {
            optional: "Optional".into(),
            please_select: "Please select...".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorMessages {
    /// Template with a `{fields}` placeholder.
    pub required_fields_missing: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            required_fields_missing: "Please fill in all required fields: {fields}".into(),
        }
    }
}
