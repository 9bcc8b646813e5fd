use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::FieldDefinition;

/// Ordered group of fields rendered as one collapsible tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}
