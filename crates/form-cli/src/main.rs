mod wizard;

use clap::{Parser, Subcommand, ValueEnum};
use form_host::{FormSession, SessionState};
use form_spec::{
    BasicTranslator, ConfigLoader, DirConfigLoader, Dispatched, DynamicForm, FieldDescriptor,
    FieldInput, FieldType, FormConfiguration, FormData, FormEvent, FormText, StepFlags,
    Translator,
    adapters::{JsonUi, TextUi, node_to_json, node_to_text},
    check_config, config_schema, create_host_translation_adapter, text_schema,
    translate::flatten_messages,
};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wizard::{AnswerParseError, PromptContext, StepHeader, Verbosity, WizardPresenter};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const LOG_ENV: &str = "DYNFORM_LOG";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Configuration-driven multi-step forms",
    long_about = "Runs, renders, validates and lints dynamic form configurations"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SchemaKind {
    Config,
    Text,
}

/// Where the form configuration and its strings come from.
#[derive(clap::Args)]
struct Source {
    /// Form configuration JSON, or a directory of `<task>.json` files.
    #[arg(long, value_name = "CONFIG")]
    config: PathBuf,
    /// Task identifier, required when CONFIG is a directory.
    #[arg(long, value_name = "TASK")]
    task: Option<String>,
    /// Nested JSON message catalog used for translation.
    #[arg(long, value_name = "MESSAGES")]
    messages: Option<PathBuf>,
    /// JSON overrides for button texts, labels and error messages.
    #[arg(long, value_name = "TEXT")]
    text: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Fill in a form step by step in the terminal.
    Wizard {
        #[command(flatten)]
        source: Source,
        /// Optional JSON file containing initial form data.
        #[arg(long, value_name = "DATA")]
        data: Option<PathBuf>,
        /// Print the fully rendered step before prompting.
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Also emit the collected data as JSON.
        #[arg(long)]
        data_json: bool,
    },
    /// Render one step without interaction.
    Render {
        #[command(flatten)]
        source: Source,
        /// Zero-based step index.
        #[arg(long, default_value_t = 0)]
        step: usize,
        /// Optional JSON file containing form data.
        #[arg(long, value_name = "DATA")]
        data: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Check the required fields of one step against form data.
    Validate {
        #[command(flatten)]
        source: Source,
        /// Zero-based step index.
        #[arg(long, default_value_t = 0)]
        step: usize,
        /// JSON file containing form data.
        #[arg(long, value_name = "DATA")]
        data: PathBuf,
    },
    /// Lint a form configuration.
    Check {
        /// Form configuration JSON, or a directory of `<task>.json` files.
        #[arg(long, value_name = "CONFIG")]
        config: PathBuf,
        /// Task identifier, required when CONFIG is a directory.
        #[arg(long, value_name = "TASK")]
        task: Option<String>,
        /// Exit with an error when any issue is found.
        #[arg(long)]
        strict: bool,
    },
    /// List the task identifiers available in a configuration directory.
    Tasks {
        #[arg(long, value_name = "DIR")]
        config: PathBuf,
    },
    /// Print a JSON Schema for configuration or text documents.
    Schema {
        #[arg(long, value_enum, default_value_t = SchemaKind::Config)]
        kind: SchemaKind,
    },
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Wizard {
            source,
            data,
            verbose,
            data_json,
        } => run_wizard(source, data, verbose, data_json),
        Command::Render {
            source,
            step,
            data,
            format,
        } => run_render(source, step, data, format),
        Command::Validate { source, step, data } => run_validate(source, step, data),
        Command::Check {
            config,
            task,
            strict,
        } => run_check(&config, task.as_deref(), strict),
        Command::Tasks { config } => run_tasks(&config),
        Command::Schema { kind } => run_schema(kind),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    let value = serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse {}: {}", path.display(), err))?;
    Ok(value)
}

fn load_form(config: &Path, task: Option<&str>) -> CliResult<FormConfiguration> {
    if config.is_dir() {
        tracing::debug!(root = %config.display(), "loading configuration from directory");
        let task = task.ok_or("--task is required when --config is a directory")?;
        let loader = DirConfigLoader::new(config);
        if !loader.is_valid_task_type(task) {
            let known = loader.available_task_types().join(", ");
            return Err(format!("unknown task '{}'; available: {}", task, known).into());
        }
        Ok(loader.load_config(task)?)
    } else {
        read_json(config)
    }
}

struct Loaded {
    form: FormConfiguration,
    translator: Box<dyn Translator>,
    text: FormText,
}

fn load_source(source: &Source) -> CliResult<Loaded> {
    let form = load_form(&source.config, source.task.as_deref())?;
    let translator: Box<dyn Translator> = match &source.messages {
        Some(path) => {
            let messages: Value = read_json(path)?;
            Box::new(create_host_translation_adapter(Some(flatten_messages(
                &messages,
            )))?)
        }
        None => Box::new(BasicTranslator::new()),
    };
    let text = match &source.text {
        Some(path) => read_json(path)?,
        None => FormText::default(),
    };
    Ok(Loaded {
        form,
        translator,
        text,
    })
}

fn load_data(path: Option<&Path>) -> CliResult<FormData> {
    match path {
        Some(path) => read_json(path),
        None => Ok(FormData::new()),
    }
}

fn run_render(
    source: Source,
    step: usize,
    data: Option<PathBuf>,
    format: RenderMode,
) -> CliResult<()> {
    let loaded = load_source(&source)?;
    let data = load_data(data.as_deref())?;
    let flags = StepFlags::for_position(step, loaded.form.step_count());
    match format {
        RenderMode::Text => {
            let ui = TextUi::default();
            let form = DynamicForm::new(&loaded.form, step, &data, flags, &ui, &loaded.translator)?
                .with_text(&loaded.text);
            println!("{}", node_to_text(&form.render()));
        }
        RenderMode::Json => {
            let ui = JsonUi::default();
            let form = DynamicForm::new(&loaded.form, step, &data, flags, &ui, &loaded.translator)?
                .with_text(&loaded.text);
            println!(
                "{}",
                serde_json::to_string_pretty(&node_to_json(&form.render()))?
            );
        }
    }
    Ok(())
}

fn run_validate(source: Source, step: usize, data: PathBuf) -> CliResult<()> {
    let loaded = load_source(&source)?;
    let data = load_data(Some(&data))?;
    let flags = StepFlags::for_position(step, loaded.form.step_count());
    let ui = TextUi::default();
    let form = DynamicForm::new(&loaded.form, step, &data, flags, &ui, &loaded.translator)?
        .with_text(&loaded.text);
    match form.validate() {
        Ok(()) => {
            println!("Step '{}' is complete.", form.current_step().id);
            Ok(())
        }
        Err(error) => {
            println!("{}", error.message);
            for field in &error.fields {
                println!(" - {}", field);
            }
            Err(format!("step '{}' is missing required fields", error.step_id).into())
        }
    }
}

fn run_check(config: &Path, task: Option<&str>, strict: bool) -> CliResult<()> {
    let form = load_form(config, task)?;
    let issues = check_config(&form);
    if issues.is_empty() {
        println!("Configuration '{}' looks good.", form.id);
        return Ok(());
    }
    println!("Configuration '{}' has {} issue(s):", form.id, issues.len());
    for issue in &issues {
        let location = match (&issue.step_id, &issue.field) {
            (Some(step), Some(field)) => format!("{}.{}", step, field),
            (Some(step), None) => step.clone(),
            _ => "form".to_string(),
        };
        println!(" - [{}] {}: {}", issue.code, location, issue.message);
    }
    if strict {
        Err(format!("{} configuration issue(s)", issues.len()).into())
    } else {
        Ok(())
    }
}

fn run_tasks(config: &Path) -> CliResult<()> {
    if !config.is_dir() {
        return Err(format!("{} is not a directory", config.display()).into());
    }
    for task in DirConfigLoader::new(config).available_task_types() {
        println!("{}", task);
    }
    Ok(())
}

fn run_schema(kind: SchemaKind) -> CliResult<()> {
    let schema = match kind {
        SchemaKind::Config => config_schema(),
        SchemaKind::Text => text_schema(),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// What the user asked for while filling in a step.
enum StepAction {
    Submit,
    Back,
}

fn run_wizard(
    source: Source,
    data: Option<PathBuf>,
    verbose: bool,
    data_json: bool,
) -> CliResult<()> {
    let loaded = load_source(&source)?;
    let state = SessionState {
        data: load_data(data.as_deref())?,
        ..SessionState::default()
    };
    let mut session = FormSession::from_state(loaded.form.clone(), state)?;
    let presenter = WizardPresenter::new(Verbosity::from_verbose(verbose), data_json);
    let ui = TextUi::default();

    while !session.is_complete() {
        let rendered = session.render(&ui, &loaded.translator, &loaded.text)?;
        let step = session.current_step();
        let header = StepHeader {
            index: session.step_index() + 1,
            total: loaded.form.step_count(),
            title: loaded.translator.t(&step.title),
            description: loaded.translator.t(&step.description),
        };
        presenter.show_step(&header, &node_to_text(&rendered));

        let event = match fill_step(&mut session, &presenter, &ui, &loaded)? {
            StepAction::Submit => FormEvent::Submit,
            StepAction::Back => FormEvent::Previous,
        };
        if let Dispatched::Blocked(error) =
            session.handle(event, &ui, &loaded.translator, &loaded.text)?
        {
            presenter.show_blocked(&error);
        }
    }

    presenter.show_completion(&session);
    Ok(())
}

fn fill_step(
    session: &mut FormSession,
    presenter: &WizardPresenter,
    ui: &TextUi,
    loaded: &Loaded,
) -> CliResult<StepAction> {
    let fields = session.current_step().fields.clone();
    for field in fields.iter().filter(|field| field.kind.is_known()) {
        loop {
            let prompt = PromptContext::new(field, session.data().get(&field.name), &loaded.translator);
            presenter.show_prompt(&prompt);
            let raw = prompt_line("> ")?;
            let trimmed = raw.trim();
            if trimmed == "<" {
                return Ok(StepAction::Back);
            }
            if trimmed.is_empty() {
                break;
            }
            match parse_answer(field, trimmed) {
                Ok(input) => {
                    session.handle(
                        FormEvent::Input {
                            field: field.name.clone(),
                            input,
                        },
                        ui,
                        &loaded.translator,
                        &loaded.text,
                    )?;
                    break;
                }
                Err(error) => presenter.show_parse_error(&error),
            }
        }
    }
    Ok(StepAction::Submit)
}

fn parse_answer(field: &FieldDescriptor, raw: &str) -> Result<FieldInput, AnswerParseError> {
    match &field.kind {
        FieldType::Checkbox => parse_boolean(raw),
        FieldType::Select => parse_choice(field, raw),
        _ => Ok(FieldInput::Text(raw.to_string())),
    }
}

fn parse_boolean(raw: &str) -> Result<FieldInput, AnswerParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(FieldInput::Toggle(true)),
        "n" | "no" | "false" | "0" => Ok(FieldInput::Toggle(false)),
        _ => Err(AnswerParseError::new(
            "expected yes or no",
            Some("yes/no, y/n, true/false, 1/0".to_string()),
        )),
    }
}

fn parse_choice(field: &FieldDescriptor, raw: &str) -> Result<FieldInput, AnswerParseError> {
    let options = field.options();
    if let Ok(index) = raw.parse::<usize>()
        && let Some(option) = index.checked_sub(1).and_then(|index| options.get(index))
    {
        return Ok(FieldInput::Text(option.value.clone()));
    }
    if let Some(option) = options.iter().find(|option| option.value == raw) {
        return Ok(FieldInput::Text(option.value.clone()));
    }
    let values = options
        .iter()
        .map(|option| option.value.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Err(AnswerParseError::new(
        format!("'{}' is not one of the listed options", raw),
        Some(format!("a number between 1 and {} or one of: {}", options.len(), values)),
    ))
}

fn prompt_line(prompt: &str) -> CliResult<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().read_line(&mut line)?;
    if read == 0 {
        return Err("input closed before the form was completed".into());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
