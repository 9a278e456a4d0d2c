//! Reference UI adapters used by the host crate and the CLI.

pub mod json;
pub mod text;

pub use json::{JsonUi, action_to_json, node_to_json};
pub use text::{TextUi, node_to_text};
