use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

use form_spec::{
    BasicTranslator, Dispatched, EngineError, FieldInput, FormConfiguration, FormEvent, FormText,
    TranslationError, Translator, adapters::JsonUi, adapters::TextUi, adapters::node_to_json,
    adapters::node_to_text, check_config, create_host_translation_adapter,
    translate::flatten_messages,
};

pub mod session;

pub use session::{FormSession, SessionState};

const DEFAULT_FORM: &str = include_str!("../../form-spec/tests/fixtures/project_form.json");

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to parse session state: {0}")]
    StateParse(#[source] serde_json::Error),
    #[error("form '{0}' is not available")]
    FormUnavailable(String),
    #[error("failed to parse field input: {0}")]
    InputParse(#[source] serde_json::Error),
    #[error("unsupported input for field '{field}': {value}")]
    InvalidInput { field: String, value: String },
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error("cbor encode error: {0}")]
    Cbor(#[source] serde_cbor::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Translation(#[from] TranslationError),
}

/// Embedding configuration: the form document, text overrides and an
/// optional nested message catalog.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct HostConfig {
    #[serde(default)]
    pub form_config_json: Option<String>,
    #[serde(default)]
    pub text: FormText,
    #[serde(default)]
    pub messages: Option<Value>,
}

impl HostConfig {
    pub fn parse(config_json: &str) -> Result<Self, HostError> {
        if config_json.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_json::from_str(config_json).map_err(HostError::ConfigParse)
        }
    }

    pub fn form(&self) -> Result<FormConfiguration, HostError> {
        let raw = self.form_config_json.as_deref().unwrap_or(DEFAULT_FORM);
        serde_json::from_str(raw).map_err(HostError::ConfigParse)
    }

    /// Host-backed translator when a catalog is configured, the basic one
    /// otherwise.
    pub fn translator(&self) -> Result<Box<dyn Translator>, HostError> {
        match &self.messages {
            Some(messages) => {
                let catalog = flatten_messages(messages);
                Ok(Box::new(create_host_translation_adapter(Some(catalog))?))
            }
            None => Ok(Box::new(BasicTranslator::new())),
        }
    }
}

struct Loaded {
    config: HostConfig,
    form: FormConfiguration,
}

fn ensure_form(form_id: &str, config_json: &str) -> Result<Loaded, HostError> {
    let config = HostConfig::parse(config_json)?;
    let form = config.form()?;
    if form.id != form_id {
        Err(HostError::FormUnavailable(form_id.to_string()))
    } else {
        Ok(Loaded { config, form })
    }
}

fn parse_state(state_json: &str) -> Result<SessionState, HostError> {
    if state_json.trim().is_empty() {
        Ok(SessionState::default())
    } else {
        serde_json::from_str(state_json).map_err(HostError::StateParse)
    }
}

fn open_session(loaded: &Loaded, state_json: &str) -> Result<FormSession, HostError> {
    FormSession::from_state(loaded.form.clone(), parse_state(state_json)?)
}

fn respond(result: Result<Value, HostError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn respond_string(result: Result<String, HostError>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn state_value(session: &FormSession) -> Result<Value, HostError> {
    serde_json::to_value(session.state()).map_err(HostError::JsonEncode)
}

/// Converts a JSON input value into widget input: strings become text,
/// booleans become toggles and lists of strings are passed on as tags.
fn field_input(field: &str, value: Value) -> Result<FieldInput, HostError> {
    match value {
        Value::String(text) => Ok(FieldInput::Text(text)),
        Value::Bool(flag) => Ok(FieldInput::Toggle(flag)),
        Value::Array(items) if items.iter().all(Value::is_string) => {
            let tags = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(tag) => Some(tag),
                    _ => None,
                })
                .collect();
            Ok(FieldInput::Tags(tags))
        }
        other => Err(HostError::InvalidInput {
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}

pub fn describe(form_id: &str, config_json: &str) -> String {
    respond(
        ensure_form(form_id, config_json)
            .and_then(|loaded| serde_json::to_value(loaded.form).map_err(HostError::JsonEncode)),
    )
}

/// Lints the configured form.
pub fn check(form_id: &str, config_json: &str) -> String {
    respond(ensure_form(form_id, config_json).and_then(|loaded| {
        let issues = check_config(&loaded.form);
        Ok(json!({
            "valid": issues.is_empty(),
            "issues": serde_json::to_value(issues).map_err(HostError::JsonEncode)?,
        }))
    }))
}

pub fn render_json_ui(form_id: &str, config_json: &str, state_json: &str) -> String {
    respond(ensure_form(form_id, config_json).and_then(|loaded| {
        let session = open_session(&loaded, state_json)?;
        let translator = loaded.config.translator()?;
        let node = session.render(&JsonUi::default(), &translator, &loaded.config.text)?;
        let mut map = Map::new();
        map.insert("form_id".into(), Value::String(loaded.form.id.clone()));
        map.insert("step_id".into(), Value::String(session.current_step().id.clone()));
        map.insert("step".into(), json!(session.step_index()));
        map.insert("total_steps".into(), json!(loaded.form.step_count()));
        map.insert("completed".into(), Value::Bool(session.is_complete()));
        map.insert("ui".into(), node_to_json(&node));
        Ok(Value::Object(map))
    }))
}

pub fn render_text(form_id: &str, config_json: &str, state_json: &str) -> String {
    respond_string(ensure_form(form_id, config_json).and_then(|loaded| {
        let session = open_session(&loaded, state_json)?;
        let translator = loaded.config.translator()?;
        let node = session.render(&TextUi::default(), &translator, &loaded.config.text)?;
        Ok(node_to_text(&node))
    }))
}

fn handle_event(
    form_id: &str,
    config_json: &str,
    state_json: &str,
    event: FormEvent,
) -> Result<Value, HostError> {
    let loaded = ensure_form(form_id, config_json)?;
    let mut session = open_session(&loaded, state_json)?;
    let translator = loaded.config.translator()?;
    let outcome = session.handle(event, &JsonUi::default(), &translator, &loaded.config.text)?;

    let status = match &outcome {
        Dispatched::Changed => "changed",
        Dispatched::Ignored => "ignored",
        Dispatched::Previous => "previous",
        Dispatched::Next if session.is_complete() => "complete",
        Dispatched::Next => "next",
        Dispatched::Blocked(_) => "error",
    };
    let mut map = Map::new();
    map.insert("status".into(), Value::String(status.into()));
    map.insert("state".into(), state_value(&session)?);
    if let Dispatched::Blocked(error) = outcome {
        map.insert("message".into(), Value::String(error.message.clone()));
        map.insert(
            "missing".into(),
            serde_json::to_value(&error.fields).map_err(HostError::JsonEncode)?,
        );
    }
    Ok(Value::Object(map))
}

/// Applies one field's new input and returns the updated state.
pub fn change_field(
    form_id: &str,
    config_json: &str,
    state_json: &str,
    field: &str,
    value_json: &str,
) -> String {
    respond(
        serde_json::from_str(value_json)
            .map_err(HostError::InputParse)
            .and_then(|value| field_input(field, value))
            .and_then(|input| {
                handle_event(
                    form_id,
                    config_json,
                    state_json,
                    FormEvent::Input {
                        field: field.to_string(),
                        input,
                    },
                )
            }),
    )
}

pub fn submit_step(form_id: &str, config_json: &str, state_json: &str) -> String {
    respond(handle_event(form_id, config_json, state_json, FormEvent::Submit))
}

pub fn previous_step(form_id: &str, config_json: &str, state_json: &str) -> String {
    respond(handle_event(form_id, config_json, state_json, FormEvent::Previous))
}
