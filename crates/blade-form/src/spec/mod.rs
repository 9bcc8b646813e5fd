pub mod field;
pub mod form;
pub mod rule;
pub mod section;

pub use field::{FieldDefinition, FieldType, SelectOption};
pub use form::{FormSchema, SchemaSet, schema_document};
pub use rule::DisplayRule;
pub use section::Section;
