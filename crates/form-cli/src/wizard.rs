use std::fmt::Write;

use form_host::FormSession;
use form_spec::{FieldDescriptor, FieldType, FieldValue, MissingFields, Translator, join_tags};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: step header and field prompts only.
    Clean,
    /// Verbose output: the whole rendered step before prompting.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints steps, prompts and outcomes for the terminal wizard.
pub struct WizardPresenter {
    verbosity: Verbosity,
    show_data_json: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity, show_data_json: bool) -> Self {
        Self {
            verbosity,
            show_data_json,
        }
    }

    pub fn show_step(&self, header: &StepHeader, rendered: &str) {
        println!();
        println!("Step {}/{}: {}", header.index, header.total, header.title);
        if self.verbosity.is_verbose() {
            println!("{}", rendered);
        } else if !header.description.is_empty() {
            println!("{}", header.description);
        }
        println!("(enter '<' to go back)");
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        let mut line = prompt.label.clone();
        if prompt.required {
            line.push_str(" *");
        }
        if let Some(hint) = &prompt.hint {
            line.push(' ');
            line.push_str(hint);
        }
        if let Some(current) = &prompt.current {
            line.push_str(&format!(" [{}]", current));
        }
        println!("{}", line);
        if let Some(description) = &prompt.description {
            println!("  {}", description);
        }
        for (index, choice) in prompt.choices.iter().enumerate() {
            println!("  {}) {}", index + 1, choice);
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if self.verbosity.is_verbose()
            && let Some(debug) = &error.debug_message
        {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_blocked(&self, error: &MissingFields) {
        eprintln!("{}", error.message);
    }

    pub fn show_completion(&self, session: &FormSession) {
        println!("Done ✅");
        match session.data_to_cbor() {
            Ok(bytes) => println!("Data (CBOR hex): {}", encode_hex(&bytes)),
            Err(err) => eprintln!("Failed to serialize data to CBOR: {}", err),
        }
        if self.show_data_json {
            match serde_json::to_string_pretty(session.data()) {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => eprintln!("Failed to serialize data to JSON: {}", err),
            }
        }
    }
}

/// Title block for the active step.
pub struct StepHeader {
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub description: String,
}

/// Context used to format a single field prompt.
pub struct PromptContext {
    pub label: String,
    pub description: Option<String>,
    pub required: bool,
    pub hint: Option<String>,
    pub current: Option<String>,
    pub choices: Vec<String>,
}

impl PromptContext {
    pub fn new<T: Translator + ?Sized>(
        field: &FieldDescriptor,
        value: Option<&FieldValue>,
        translator: &T,
    ) -> Self {
        let choices = field
            .options()
            .iter()
            .map(|option| format!("{} ({})", translator.t(&option.label), option.value))
            .collect();
        Self {
            label: translator.t(&field.label),
            description: field.description.as_deref().map(|key| translator.t(key)),
            required: field.required,
            hint: hint(&field.kind),
            current: value.and_then(current_display),
            choices,
        }
    }
}

fn hint(kind: &FieldType) -> Option<String> {
    match kind {
        FieldType::Checkbox => Some("(yes/no, y/n, true/false)".to_string()),
        FieldType::Tags => Some("(comma separated)".to_string()),
        FieldType::Select => Some("(number or value)".to_string()),
        _ => None,
    }
}

fn current_display(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(text) if !text.is_empty() => Some(text.clone()),
        FieldValue::Flag(flag) => Some(if *flag { "yes" } else { "no" }.to_string()),
        FieldValue::Tags(tags) if !tags.is_empty() => Some(join_tags(tags)),
        _ => None,
    }
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut encoded, "{:02x}", byte).expect("writing to string cannot fail");
    }
    encoded
}
