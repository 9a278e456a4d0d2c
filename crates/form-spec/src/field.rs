use std::borrow::Cow;

use serde_json::Value;

use crate::data::FieldValue;
use crate::spec::field::{FieldDescriptor, FieldType};
use crate::text::FieldLabels;
use crate::translate::Translator;
use crate::ui::{
    Action, CheckboxNode, FieldInput, InputProps, LabelProps, Node, Region, SelectNode,
    SelectOptionNode, TextareaProps, UiAdapter,
};

/// Rows used for a `textarea` without an explicit `rows` hint.
pub const DEFAULT_TEXTAREA_ROWS: u32 = 4;

const TAG_SEPARATOR: &str = ", ";

/// Splits tag input on commas, trimming each segment and dropping empty ones.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}

/// Trims each tag and drops empty ones; commas inside a tag are kept.
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(TAG_SEPARATOR)
}

/// Converts raw widget input into the new value for `field`.
///
/// Returns `None` for unknown field types and for input that does not fit the
/// field (a toggle sent to a text field, text sent to a checkbox).
pub fn interpret_input(field: &FieldDescriptor, input: FieldInput) -> Option<FieldValue> {
    match (&field.kind, input) {
        (FieldType::Input | FieldType::Textarea | FieldType::Select, FieldInput::Text(text)) => {
            Some(FieldValue::Text(text))
        }
        (FieldType::Tags, FieldInput::Text(text)) => Some(FieldValue::Tags(split_tags(&text))),
        (FieldType::Tags, FieldInput::Tags(tags)) => Some(FieldValue::Tags(clean_tags(tags))),
        (FieldType::Checkbox, FieldInput::Toggle(checked)) => Some(FieldValue::Flag(checked)),
        (kind, input) => {
            tracing::debug!(field = %field.name, %kind, ?input, "input ignored for field");
            None
        }
    }
}

fn display_text(value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::Text(text)) => text.clone(),
        Some(FieldValue::Other(Value::String(text))) => text.clone(),
        Some(FieldValue::Other(Value::Number(number))) => number.to_string(),
        _ => String::new(),
    }
}

/// Renders one field descriptor and interprets input aimed at it.
pub struct FieldRenderer<'a, U: ?Sized, T: ?Sized> {
    field: &'a FieldDescriptor,
    value: Option<&'a FieldValue>,
    ui: &'a U,
    translator: &'a T,
    labels: Cow<'a, FieldLabels>,
}

impl<'a, U, T> FieldRenderer<'a, U, T>
where
    U: UiAdapter + ?Sized,
    T: Translator + ?Sized,
{
    pub fn new(
        field: &'a FieldDescriptor,
        value: Option<&'a FieldValue>,
        ui: &'a U,
        translator: &'a T,
    ) -> Self {
        Self {
            field,
            value,
            ui,
            translator,
            labels: Cow::Owned(FieldLabels::default()),
        }
    }

    pub fn with_labels(mut self, labels: &'a FieldLabels) -> Self {
        self.labels = Cow::Borrowed(labels);
        self
    }

    /// Label line, control (with icon) and description, grouped as a field.
    pub fn render(&self) -> Node<U::Widget> {
        let mut children = vec![self.label()];
        if let Some(control) = self.control() {
            let mut control_children = vec![control];
            if let Some(icon) = &self.field.icon {
                control_children.push(Node::Icon(icon.clone()));
            }
            children.push(Node::group(Region::Control, control_children));
        }
        if let Some(description) = &self.field.description {
            children.push(Node::group(
                Region::FieldDescription,
                vec![Node::text(self.translator.t(description))],
            ));
        }
        Node::group(Region::Field, children)
    }

    /// Interprets `input` and hands the new value to `on_change`. Returns
    /// whether `on_change` was invoked.
    pub fn change(&self, input: FieldInput, on_change: impl FnOnce(FieldValue)) -> bool {
        match interpret_input(self.field, input) {
            Some(value) => {
                on_change(value);
                true
            }
            None => false,
        }
    }

    fn label(&self) -> Node<U::Widget> {
        let marker = if self.field.required {
            Node::group(Region::RequiredMarker, vec![Node::text("*")])
        } else {
            let optional = self.translator.t(&self.labels.optional);
            Node::group(
                Region::OptionalMarker,
                vec![Node::text(format!("({optional})"))],
            )
        };
        Node::Widget(self.ui.label(LabelProps {
            html_for: self.field.name.clone(),
            children: vec![Node::text(self.translator.t(&self.field.label)), marker],
        }))
    }

    fn placeholder(&self) -> String {
        self.field
            .placeholder
            .as_deref()
            .map(|key| self.translator.t(key))
            .unwrap_or_default()
    }

    fn control(&self) -> Option<Node<U::Widget>> {
        let field = self.field;
        let on_change = Action::change(&field.name);
        let node = match &field.kind {
            FieldType::Input => Node::Widget(self.ui.input(InputProps {
                id: field.name.clone(),
                value: display_text(self.value),
                placeholder: self.placeholder(),
                required: field.required,
                on_change,
            })),
            FieldType::Textarea => Node::Widget(self.ui.textarea(TextareaProps {
                id: field.name.clone(),
                value: display_text(self.value),
                placeholder: self.placeholder(),
                rows: field.rows.unwrap_or(DEFAULT_TEXTAREA_ROWS),
                required: field.required,
                on_change,
            })),
            FieldType::Tags => Node::Widget(self.ui.input(InputProps {
                id: field.name.clone(),
                value: self
                    .value
                    .and_then(FieldValue::as_tags)
                    .map(join_tags)
                    .unwrap_or_default(),
                placeholder: self.placeholder(),
                required: field.required,
                on_change,
            })),
            FieldType::Select => Node::Select(self.select(on_change)),
            FieldType::Checkbox => Node::Checkbox(CheckboxNode {
                id: field.name.clone(),
                checked: self.value.is_some_and(|value| !value.is_missing()),
                on_change,
            }),
            FieldType::Other(kind) => {
                tracing::debug!(field = %field.name, kind = %kind, "no renderer for field type");
                return None;
            }
        };
        Some(node)
    }

    fn select(&self, on_change: Action) -> SelectNode {
        let current = self.value.and_then(FieldValue::as_text).unwrap_or_default();
        let declared = self.field.options();
        let matched = declared.iter().any(|option| option.value == current);

        let placeholder = match &self.field.placeholder {
            Some(key) => self.translator.t(key),
            None => self.translator.t(&self.labels.please_select),
        };
        let mut options = Vec::with_capacity(declared.len() + 1);
        options.push(SelectOptionNode {
            value: String::new(),
            label: placeholder,
            disabled: true,
            selected: !matched,
        });
        options.extend(declared.iter().map(|option| SelectOptionNode {
            value: option.value.clone(),
            label: self.translator.t(&option.label),
            disabled: false,
            selected: matched && option.value == current,
        }));

        SelectNode {
            id: self.field.name.clone(),
            options,
            required: self.field.required,
            on_change,
        }
    }
}

/// Renders `field` with the default marker labels.
///
/// Controls are bound to [`Action::Change`] for the field's name; feed the
/// resulting input through [`FieldRenderer::change`] to obtain the value for
/// the host's `on_change`.
pub fn render_field<U, T>(
    field: &FieldDescriptor,
    value: Option<&FieldValue>,
    ui: &U,
    translator: &T,
) -> Node<U::Widget>
where
    U: UiAdapter + ?Sized,
    T: Translator + ?Sized,
{
    FieldRenderer::new(field, value, ui, translator).render()
}
