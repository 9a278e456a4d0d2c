//! UI adapter contract and the engine's render tree.
//!
//! The engine draws text controls, labels, buttons and the progress indicator
//! through a caller-supplied [`UiAdapter`]; structure (groups, headings,
//! select lists, checkboxes) is expressed with engine-owned [`Node`] variants
//! that every host can map onto its own toolkit.
//!
//! Interactive props carry an [`Action`] instead of a closure. The host routes
//! user activity back to the engine as events named by that action, which
//! keeps rendered trees plain comparable data.

/// What a widget triggers when the user interacts with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Value of the named field changed.
    Change { field: String },
    Previous,
    Submit,
}

impl Action {
    pub fn change(field: impl Into<String>) -> Self {
        Action::Change {
            field: field.into(),
        }
    }
}

/// Raw input reported by a widget before the field renderer interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    Toggle(bool),
    /// Already separated tags, for hosts whose widget reports a list.
    Tags(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputProps {
    pub id: String,
    pub value: String,
    pub placeholder: String,
    pub required: bool,
    pub on_change: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextareaProps {
    pub id: String,
    pub value: String,
    pub placeholder: String,
    pub rows: u32,
    pub required: bool,
    pub on_change: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelProps<W> {
    /// Id of the control the label describes.
    pub html_for: String,
    pub children: Vec<Node<W>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonType {
    Button,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonVariant {
    Primary,
    Outline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonProps {
    pub label: String,
    pub button_type: ButtonType,
    pub variant: ButtonVariant,
    pub disabled: bool,
    pub on_click: Action,
}

/// Progress position, `current_step` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressProps {
    pub current_step: usize,
    pub total_steps: usize,
}

/// Primitive widgets supplied by the host.
///
/// `progress_step` is optional: the default returns `None` and the engine
/// then omits the progress region.
pub trait UiAdapter {
    type Widget: Clone + PartialEq + std::fmt::Debug;

    fn input(&self, props: InputProps) -> Self::Widget;
    fn textarea(&self, props: TextareaProps) -> Self::Widget;
    fn label(&self, props: LabelProps<Self::Widget>) -> Self::Widget;
    fn button(&self, props: ButtonProps) -> Self::Widget;

    fn progress_step(&self, _props: ProgressProps) -> Option<Self::Widget> {
        None
    }
}

impl<U: UiAdapter + ?Sized> UiAdapter for &U {
    type Widget = U::Widget;

    fn input(&self, props: InputProps) -> Self::Widget {
        (**self).input(props)
    }

    fn textarea(&self, props: TextareaProps) -> Self::Widget {
        (**self).textarea(props)
    }

    fn label(&self, props: LabelProps<Self::Widget>) -> Self::Widget {
        (**self).label(props)
    }

    fn button(&self, props: ButtonProps) -> Self::Widget {
        (**self).button(props)
    }

    fn progress_step(&self, props: ProgressProps) -> Option<Self::Widget> {
        (**self).progress_step(props)
    }
}

/// Structural area a [`Node::Group`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Form,
    Progress,
    Header,
    Title,
    Description,
    Fields,
    Field,
    Control,
    RequiredMarker,
    OptionalMarker,
    FieldDescription,
    Buttons,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Form => "form",
            Region::Progress => "progress",
            Region::Header => "header",
            Region::Title => "title",
            Region::Description => "description",
            Region::Fields => "fields",
            Region::Field => "field",
            Region::Control => "control",
            Region::RequiredMarker => "required_marker",
            Region::OptionalMarker => "optional_marker",
            Region::FieldDescription => "field_description",
            Region::Buttons => "buttons",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOptionNode {
    pub value: String,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectNode {
    pub id: String,
    /// Placeholder first, then declared options in order.
    pub options: Vec<SelectOptionNode>,
    pub required: bool,
    pub on_change: Action,
}

impl SelectNode {
    pub fn selected(&self) -> Option<&SelectOptionNode> {
        self.options.iter().find(|option| option.selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxNode {
    pub id: String,
    pub checked: bool,
    pub on_change: Action,
}

/// Render tree produced by the engine; `W` is the adapter's widget type.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<W> {
    Widget(W),
    Text(String),
    Group { region: Region, children: Vec<Node<W>> },
    Select(SelectNode),
    Checkbox(CheckboxNode),
    /// Decorative icon shown next to a control.
    Icon(String),
}

impl<W> Node<W> {
    pub fn group(region: Region, children: Vec<Node<W>>) -> Self {
        Node::Group { region, children }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn children(&self) -> &[Node<W>] {
        match self {
            Node::Group { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first search for the first group tagged with `region`.
    pub fn find_region(&self, region: Region) -> Option<&Node<W>> {
        match self {
            Node::Group {
                region: current,
                children,
            } => {
                if *current == region {
                    return Some(self);
                }
                children.iter().find_map(|child| child.find_region(region))
            }
            _ => None,
        }
    }

    /// Every group tagged with `region`, in document order.
    pub fn regions(&self, region: Region) -> Vec<&Node<W>> {
        let mut found = Vec::new();
        self.collect_regions(region, &mut found);
        found
    }

    fn collect_regions<'a>(&'a self, region: Region, found: &mut Vec<&'a Node<W>>) {
        if let Node::Group {
            region: current,
            children,
        } = self
        {
            if *current == region {
                found.push(self);
            }
            for child in children {
                child.collect_regions(region, found);
            }
        }
    }

    /// Concatenated plain text of this node's `Text` descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Group { children, .. } => {
                for child in children {
                    child.push_text(out);
                }
            }
            _ => {}
        }
    }

    /// Every widget in document order, including widgets nested in groups.
    pub fn widgets(&self) -> Vec<&W> {
        let mut found = Vec::new();
        self.collect_widgets(&mut found);
        found
    }

    fn collect_widgets<'a>(&'a self, found: &mut Vec<&'a W>) {
        match self {
            Node::Widget(widget) => found.push(widget),
            Node::Group { children, .. } => {
                for child in children {
                    child.collect_widgets(found);
                }
            }
            _ => {}
        }
    }
}
