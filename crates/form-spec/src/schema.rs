use schemars::schema_for;
use serde_json::Value;

use crate::spec::form::FormConfiguration;
use crate::text::FormText;

/// JSON Schema of the form configuration document.
pub fn config_schema() -> Value {
    schema_for!(FormConfiguration).to_value()
}

/// JSON Schema of the text override document.
pub fn text_schema() -> Value {
    schema_for!(FormText).to_value()
}
