use serde_json::{Map, Value, json};

use crate::ui::{
    Action, ButtonProps, ButtonType, ButtonVariant, InputProps, LabelProps, Node, ProgressProps,
    TextareaProps, UiAdapter,
};

/// Adapter producing JSON widgets, for hosts that draw the form themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonUi {
    /// Omit the progress indicator.
    pub hide_progress: bool,
}

pub fn action_to_json(action: &Action) -> Value {
    match action {
        Action::Change { field } => json!({ "action": "change", "field": field }),
        Action::Previous => json!({ "action": "previous" }),
        Action::Submit => json!({ "action": "submit" }),
    }
}

impl UiAdapter for JsonUi {
    type Widget = Value;

    fn input(&self, props: InputProps) -> Value {
        json!({
            "type": "input",
            "id": props.id,
            "value": props.value,
            "placeholder": props.placeholder,
            "required": props.required,
            "onChange": action_to_json(&props.on_change),
        })
    }

    fn textarea(&self, props: TextareaProps) -> Value {
        json!({
            "type": "textarea",
            "id": props.id,
            "value": props.value,
            "placeholder": props.placeholder,
            "rows": props.rows,
            "required": props.required,
            "onChange": action_to_json(&props.on_change),
        })
    }

    fn label(&self, props: LabelProps<Value>) -> Value {
        json!({
            "type": "label",
            "for": props.html_for,
            "children": props.children.iter().map(node_to_json).collect::<Vec<_>>(),
        })
    }

    fn button(&self, props: ButtonProps) -> Value {
        let button_type = match props.button_type {
            ButtonType::Button => "button",
            ButtonType::Submit => "submit",
        };
        let variant = match props.variant {
            ButtonVariant::Primary => "primary",
            ButtonVariant::Outline => "outline",
        };
        json!({
            "type": "button",
            "label": props.label,
            "buttonType": button_type,
            "variant": variant,
            "disabled": props.disabled,
            "onClick": action_to_json(&props.on_click),
        })
    }

    fn progress_step(&self, props: ProgressProps) -> Option<Value> {
        if self.hide_progress {
            return None;
        }
        Some(json!({
            "type": "progress",
            "currentStep": props.current_step,
            "totalSteps": props.total_steps,
        }))
    }
}

/// Serialises a render tree whose widgets are already JSON.
pub fn node_to_json(node: &Node<Value>) -> Value {
    match node {
        Node::Widget(widget) => widget.clone(),
        Node::Text(text) => json!({ "type": "text", "text": text }),
        Node::Group { region, children } => json!({
            "type": "group",
            "region": region.as_str(),
            "children": children.iter().map(node_to_json).collect::<Vec<_>>(),
        }),
        Node::Select(select) => {
            let options = select
                .options
                .iter()
                .map(|option| {
                    let mut map = Map::new();
                    map.insert("value".into(), Value::String(option.value.clone()));
                    map.insert("label".into(), Value::String(option.label.clone()));
                    if option.disabled {
                        map.insert("disabled".into(), Value::Bool(true));
                    }
                    if option.selected {
                        map.insert("selected".into(), Value::Bool(true));
                    }
                    Value::Object(map)
                })
                .collect::<Vec<_>>();
            json!({
                "type": "select",
                "id": select.id,
                "required": select.required,
                "options": options,
                "onChange": action_to_json(&select.on_change),
            })
        }
        Node::Checkbox(checkbox) => json!({
            "type": "checkbox",
            "id": checkbox.id,
            "checked": checkbox.checked,
            "onChange": action_to_json(&checkbox.on_change),
        }),
        Node::Icon(icon) => json!({ "type": "icon", "icon": icon }),
    }
}
