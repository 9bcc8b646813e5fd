use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::rule::DisplayRule;

/// Closed set of widget kinds a field can be built as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Date,
    SingleSelect,
    MultiSelect,
    Toggle,
}

impl FieldType {
    /// Maps a schema type tag onto a widget kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(FieldType::Text),
            "date" => Some(FieldType::Date),
            "single-select" => Some(FieldType::SingleSelect),
            "multi-select" => Some(FieldType::MultiSelect),
            "toggle" => Some(FieldType::Toggle),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            FieldType::Text => "string",
            FieldType::Date => "date",
            FieldType::SingleSelect => "single-select",
            FieldType::MultiSelect => "multi-select",
            FieldType::Toggle => "toggle",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Label/value pair offered by select widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Static description of one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Unique across the whole form, not only within the section.
    pub field_name: String,
    /// Raw type tag; unknown tags fail when the widget is built.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_rule: Option<DisplayRule>,
}

impl FieldDefinition {
    pub fn new(field_name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            kind: kind.into(),
            field_value: None,
            options: Vec::new(),
            mandatory: false,
            display_rule: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.field_value = Some(value);
        self
    }

    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = values
            .into_iter()
            .map(|value| {
                let value = value.into();
                SelectOption::new(value.clone(), value)
            })
            .collect();
        self
    }

    pub fn with_rule(mut self, rule: DisplayRule) -> Self {
        self.display_rule = Some(rule);
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_tag(&self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_definition() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "fieldName": "Operating Company",
            "type": "single-select",
            "options": [{ "label": "VM02", "value": "VM02" }],
            "displayRule": { "fieldName": "Toggle", "value": true },
            "fieldValue": "VM02"
        }))
        .expect("deserialize");

        assert_eq!(field.field_type(), Some(FieldType::SingleSelect));
        assert!(!field.mandatory);
        assert_eq!(field.display_rule.expect("rule").field_name, "Toggle");
    }

    #[test]
    fn unknown_tag_survives_parsing() {
        let field: FieldDefinition =
            serde_json::from_value(json!({ "fieldName": "Budget", "type": "currency" }))
                .expect("deserialize");
        assert_eq!(field.kind, "currency");
        assert_eq!(field.field_type(), None);
    }
}
