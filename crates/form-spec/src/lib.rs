#![allow(missing_docs)]

pub mod adapters;
pub mod data;
pub mod engine;
pub mod field;
pub mod loader;
pub mod schema;
pub mod spec;
pub mod text;
pub mod translate;
pub mod ui;
pub mod validate;

pub use data::{FieldValue, FormData, FormPatch};
pub use engine::{
    Dispatched, DynamicForm, EngineError, FormCallbacks, FormEvent, Overrides, StepFlags,
    render_form,
};
pub use field::{FieldRenderer, interpret_input, join_tags, render_field, split_tags};
pub use loader::{
    ConfigLoader, DEFAULT_TASK_TYPES, DirConfigLoader, FnConfigLoader, LoaderError,
    StaticConfigLoader,
};
pub use schema::{config_schema, text_schema};
pub use spec::{FieldDescriptor, FieldOption, FieldType, FormConfiguration, StepDescriptor};
pub use text::{ButtonTexts, ErrorMessages, FieldLabels, FormText};
pub use translate::{
    BasicTranslator, HostTranslator, Params, TranslationError, TranslationProvider, Translator,
    create_basic_translation_adapter, create_host_translation_adapter,
};
pub use ui::{
    Action, ButtonProps, ButtonType, ButtonVariant, FieldInput, InputProps, LabelProps, Node,
    ProgressProps, Region, TextareaProps, UiAdapter,
};
pub use validate::{ConfigIssue, MissingFields, check_config, missing_required};
