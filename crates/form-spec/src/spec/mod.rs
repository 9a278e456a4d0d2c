pub mod field;
pub mod form;
pub mod step;

pub use field::{FieldDescriptor, FieldOption, FieldType};
pub use form::FormConfiguration;
pub use step::StepDescriptor;
