//! Step orchestration: composes the active step and owns submission.
//!
//! [`DynamicForm`] borrows everything it needs for one call and keeps no
//! state of its own. The host owns the step index and the form data and
//! changes them only from inside [`FormCallbacks`].

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::data::{FormData, FormPatch};
use crate::field::FieldRenderer;
use crate::spec::form::FormConfiguration;
use crate::spec::step::StepDescriptor;
use crate::text::FormText;
use crate::translate::Translator;
use crate::ui::{
    Action, ButtonProps, ButtonType, ButtonVariant, FieldInput, Node, ProgressProps, Region,
    UiAdapter,
};
use crate::validate::{MissingFields, missing_required};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("step index {index} is outside the form's {count} steps")]
    StepOutOfRange { index: usize, count: usize },
    #[error("field '{field}' is not part of step '{step}'")]
    UnknownField { step: String, field: String },
}

/// Position flags decided by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepFlags {
    pub is_first_step: bool,
    pub is_last_step: bool,
}

impl StepFlags {
    /// Flags derived from the index alone, for hosts without their own notion
    /// of first and last.
    pub fn for_position(index: usize, count: usize) -> Self {
        Self {
            is_first_step: index == 0,
            is_last_step: index.saturating_add(1) >= count,
        }
    }
}

/// Host hooks the engine calls into.
pub trait FormCallbacks {
    /// Receives a patch holding only the changed field.
    fn on_data_change(&mut self, patch: FormPatch);
    fn on_next(&mut self);
    fn on_previous(&mut self);

    /// Shows a blocked submission to the user.
    fn on_validation_error(&mut self, error: &MissingFields) {
        tracing::warn!(step = %error.step_id, fields = ?error.fields, "{}", error.message);
    }
}

/// User activity routed back to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Input { field: String, input: FieldInput },
    Previous,
    Submit,
}

/// Outcome of [`DynamicForm::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Changed,
    /// The input did not produce a value for the field.
    Ignored,
    Previous,
    Next,
    Blocked(MissingFields),
}

type ButtonRenderer<W> = Box<dyn Fn(Action, bool) -> Node<W> + Send + Sync>;
type ProgressRenderer<W> = Box<dyn Fn(usize, usize) -> Option<Node<W>> + Send + Sync>;

/// Caller-supplied replacements for the navigation buttons and the progress
/// indicator. An override always wins over the default renderer.
pub struct Overrides<W> {
    previous_button: Option<ButtonRenderer<W>>,
    next_button: Option<ButtonRenderer<W>>,
    progress: Option<ProgressRenderer<W>>,
}

impl<W> Default for Overrides<W> {
    fn default() -> Self {
        Self {
            previous_button: None,
            next_button: None,
            progress: None,
        }
    }
}

impl<W> fmt::Debug for Overrides<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("previous_button", &self.previous_button.is_some())
            .field("next_button", &self.next_button.is_some())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl<W> Overrides<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `render(on_click, is_first_step)`.
    pub fn previous_button(
        mut self,
        render: impl Fn(Action, bool) -> Node<W> + Send + Sync + 'static,
    ) -> Self {
        self.previous_button = Some(Box::new(render));
        self
    }

    /// `render(on_click, is_last_step)`.
    pub fn next_button(
        mut self,
        render: impl Fn(Action, bool) -> Node<W> + Send + Sync + 'static,
    ) -> Self {
        self.next_button = Some(Box::new(render));
        self
    }

    /// `render(current_step, total_steps)` with a 1-based current step;
    /// returning `None` omits the progress region.
    pub fn progress(
        mut self,
        render: impl Fn(usize, usize) -> Option<Node<W>> + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Box::new(render));
        self
    }
}

/// One render/submit pass over the active step.
pub struct DynamicForm<'a, U: UiAdapter + ?Sized, T: ?Sized> {
    config: &'a FormConfiguration,
    step_index: usize,
    step: &'a StepDescriptor,
    data: &'a FormData,
    flags: StepFlags,
    ui: &'a U,
    translator: &'a T,
    text: Cow<'a, FormText>,
    overrides: Option<&'a Overrides<U::Widget>>,
}

impl<'a, U, T> DynamicForm<'a, U, T>
where
    U: UiAdapter + ?Sized,
    T: Translator + ?Sized,
{
    pub fn new(
        config: &'a FormConfiguration,
        step_index: usize,
        data: &'a FormData,
        flags: StepFlags,
        ui: &'a U,
        translator: &'a T,
    ) -> Result<Self, EngineError> {
        let step = config
            .step(step_index)
            .ok_or(EngineError::StepOutOfRange {
                index: step_index,
                count: config.step_count(),
            })?;
        Ok(Self {
            config,
            step_index,
            step,
            data,
            flags,
            ui,
            translator,
            text: Cow::Owned(FormText::default()),
            overrides: None,
        })
    }

    pub fn with_text(mut self, text: &'a FormText) -> Self {
        self.text = Cow::Borrowed(text);
        self
    }

    pub fn with_overrides(mut self, overrides: &'a Overrides<U::Widget>) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn current_step(&self) -> &'a StepDescriptor {
        self.step
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Progress, header, fields and navigation for the active step.
    pub fn render(&self) -> Node<U::Widget> {
        tracing::debug!(
            form = %self.config.id,
            step = %self.step.id,
            index = self.step_index,
            "rendering step"
        );

        let mut children = Vec::with_capacity(4);
        if let Some(progress) = self.progress() {
            children.push(Node::group(Region::Progress, vec![progress]));
        }
        children.push(Node::group(
            Region::Header,
            vec![
                Node::group(
                    Region::Title,
                    vec![Node::text(self.translator.t(&self.step.title))],
                ),
                Node::group(
                    Region::Description,
                    vec![Node::text(self.translator.t(&self.step.description))],
                ),
            ],
        ));
        children.push(Node::group(Region::Fields, self.fields()));
        children.push(Node::group(
            Region::Buttons,
            vec![self.previous_button(), self.next_button()],
        ));

        Node::group(Region::Form, children)
    }

    /// Checks the active step's required fields. Every field is checked
    /// before the result is returned.
    pub fn validate(&self) -> Result<(), MissingFields> {
        let missing = missing_required(self.step, self.data);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingFields::new(
                self.step,
                &missing,
                self.translator,
                &self.text.error_messages,
            ))
        }
    }

    /// Validates and, when nothing is missing, calls `on_next` once.
    pub fn submit<C: FormCallbacks + ?Sized>(&self, callbacks: &mut C) -> Result<(), MissingFields> {
        match self.validate() {
            Ok(()) => {
                tracing::debug!(step = %self.step.id, "step submitted");
                callbacks.on_next();
                Ok(())
            }
            Err(error) => {
                callbacks.on_validation_error(&error);
                Err(error)
            }
        }
    }

    /// Backward navigation is never gated.
    pub fn previous<C: FormCallbacks + ?Sized>(&self, callbacks: &mut C) {
        callbacks.on_previous();
    }

    /// Interprets input for `field_name` and forwards a single-field patch.
    /// Returns `Ok(false)` when the input produced no value.
    pub fn change<C: FormCallbacks + ?Sized>(
        &self,
        field_name: &str,
        input: FieldInput,
        callbacks: &mut C,
    ) -> Result<bool, EngineError> {
        let field = self
            .step
            .field(field_name)
            .ok_or_else(|| EngineError::UnknownField {
                step: self.step.id.clone(),
                field: field_name.to_string(),
            })?;
        let renderer = FieldRenderer::new(field, self.data.get(field_name), self.ui, self.translator);
        Ok(renderer.change(input, |value| {
            callbacks.on_data_change(FormPatch::single(field.name.clone(), value));
        }))
    }

    pub fn dispatch<C: FormCallbacks + ?Sized>(
        &self,
        event: FormEvent,
        callbacks: &mut C,
    ) -> Result<Dispatched, EngineError> {
        let outcome = match event {
            FormEvent::Input { field, input } => {
                if self.change(&field, input, callbacks)? {
                    Dispatched::Changed
                } else {
                    Dispatched::Ignored
                }
            }
            FormEvent::Previous => {
                self.previous(callbacks);
                Dispatched::Previous
            }
            FormEvent::Submit => match self.submit(callbacks) {
                Ok(()) => Dispatched::Next,
                Err(error) => Dispatched::Blocked(error),
            },
        };
        Ok(outcome)
    }

    fn fields(&self) -> Vec<Node<U::Widget>> {
        self.step
            .fields
            .iter()
            .map(|field| {
                FieldRenderer::new(field, self.data.get(&field.name), self.ui, self.translator)
                    .with_labels(&self.text.labels)
                    .render()
            })
            .collect()
    }

    fn progress(&self) -> Option<Node<U::Widget>> {
        let current = self.step_index + 1;
        let total = self.config.step_count();
        match self.overrides.and_then(|overrides| overrides.progress.as_ref()) {
            Some(render) => render(current, total),
            None => self
                .ui
                .progress_step(ProgressProps {
                    current_step: current,
                    total_steps: total,
                })
                .map(Node::Widget),
        }
    }

    fn previous_button(&self) -> Node<U::Widget> {
        let is_first = self.flags.is_first_step;
        if let Some(render) = self
            .overrides
            .and_then(|overrides| overrides.previous_button.as_ref())
        {
            return render(Action::Previous, is_first);
        }
        let texts = &self.text.button_texts;
        let label = if is_first { &texts.back } else { &texts.previous };
        Node::Widget(self.ui.button(ButtonProps {
            label: self.translator.t(label),
            button_type: ButtonType::Button,
            variant: ButtonVariant::Outline,
            disabled: is_first,
            on_click: Action::Previous,
        }))
    }

    fn next_button(&self) -> Node<U::Widget> {
        let is_last = self.flags.is_last_step;
        if let Some(render) = self
            .overrides
            .and_then(|overrides| overrides.next_button.as_ref())
        {
            return render(Action::Submit, is_last);
        }
        let texts = &self.text.button_texts;
        let label = if is_last { &texts.submit } else { &texts.next };
        Node::Widget(self.ui.button(ButtonProps {
            label: self.translator.t(label),
            button_type: ButtonType::Submit,
            variant: ButtonVariant::Primary,
            disabled: false,
            on_click: Action::Submit,
        }))
    }
}

/// Renders the active step in one call.
#[allow(clippy::too_many_arguments)]
pub fn render_form<U, T>(
    config: &FormConfiguration,
    step_index: usize,
    data: &FormData,
    flags: StepFlags,
    ui: &U,
    translator: &T,
    text: Option<&FormText>,
    overrides: Option<&Overrides<U::Widget>>,
) -> Result<Node<U::Widget>, EngineError>
where
    U: UiAdapter + ?Sized,
    T: Translator + ?Sized,
{
    let mut form = DynamicForm::new(config, step_index, data, flags, ui, translator)?;
    if let Some(text) = text {
        form = form.with_text(text);
    }
    if let Some(overrides) = overrides {
        form = form.with_overrides(overrides);
    }
    Ok(form.render())
}
