use crate::ui::{
    ButtonProps, InputProps, LabelProps, Node, ProgressProps, Region, TextareaProps, UiAdapter,
};

/// Plain-text adapter used by the terminal wizard.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextUi {
    pub hide_progress: bool,
}

fn boxed(value: &str, placeholder: &str) -> String {
    if value.is_empty() && !placeholder.is_empty() {
        format!("[ <{placeholder}> ]")
    } else {
        format!("[ {value} ]")
    }
}

impl UiAdapter for TextUi {
    type Widget = String;

    fn input(&self, props: InputProps) -> String {
        boxed(&props.value, &props.placeholder)
    }

    fn textarea(&self, props: TextareaProps) -> String {
        format!("{} ({} rows)", boxed(&props.value, &props.placeholder), props.rows)
    }

    fn label(&self, props: LabelProps<String>) -> String {
        props
            .children
            .iter()
            .map(node_to_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn button(&self, props: ButtonProps) -> String {
        if props.disabled {
            format!("({})", props.label)
        } else {
            format!("<{}>", props.label)
        }
    }

    fn progress_step(&self, props: ProgressProps) -> Option<String> {
        if self.hide_progress {
            return None;
        }
        Some(format!("Step {}/{}", props.current_step, props.total_steps))
    }
}

fn inline(region: Region) -> bool {
    matches!(
        region,
        Region::Control | Region::Buttons | Region::RequiredMarker | Region::OptionalMarker
    )
}

/// Flattens a text render tree into printable lines.
pub fn node_to_text(node: &Node<String>) -> String {
    match node {
        Node::Widget(widget) => widget.clone(),
        Node::Text(text) => text.clone(),
        Node::Icon(icon) => icon.clone(),
        Node::Checkbox(checkbox) => {
            if checkbox.checked {
                "[x]".to_string()
            } else {
                "[ ]".to_string()
            }
        }
        Node::Select(select) => select
            .options
            .iter()
            .map(|option| {
                let mark = if option.selected { "(*)" } else { "( )" };
                if option.disabled {
                    format!("  {mark} {}", option.label)
                } else {
                    format!("  {mark} {} = {}", option.label, option.value)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Node::Group { region, children } => {
            let parts = children
                .iter()
                .map(node_to_text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>();
            match region {
                Region::Title => format!("== {} ==", parts.join(" ")),
                Region::Buttons => parts.join("  "),
                region if inline(*region) => parts.join(" "),
                _ => parts.join("\n"),
            }
        }
    }
}
