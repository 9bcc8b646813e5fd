use std::{fs, path::Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormError;
use crate::spec::section::Section;

/// Form definition bound to every blade of the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSchema {
    #[serde(rename = "type")]
    pub blade_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Footer navigation labels.
    #[serde(default)]
    pub footer: Vec<String>,
}

/// The full list of schemas a page knows about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SchemaSet {
    pub schemas: Vec<FormSchema>,
}

impl SchemaSet {
    pub fn new(schemas: Vec<FormSchema>) -> Self {
        Self { schemas }
    }

    /// Parses either a list of schemas or a single schema object.
    pub fn from_json_str(raw: &str) -> Result<Self, FormError> {
        let value: Value = serde_json::from_str(raw).map_err(FormError::SchemaParse)?;
        if value.is_array() {
            serde_json::from_value(value).map_err(FormError::SchemaParse)
        } else {
            let schema: FormSchema =
                serde_json::from_value(value).map_err(FormError::SchemaParse)?;
            Ok(Self::new(vec![schema]))
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FormError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| FormError::SchemaRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// First schema declaring the given blade type.
    pub fn find(&self, blade_type: &str) -> Option<&FormSchema> {
        self.schemas
            .iter()
            .find(|schema| schema.blade_type == blade_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormSchema> {
        self.schemas.iter()
    }
}

/// JSON Schema describing the schema file format.
pub fn schema_document() -> Value {
    let schema = schemars::schema_for!(SchemaSet);
    serde_json::to_value(schema).unwrap_or(Value::Null)
}
