use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Visibility condition tying a field to the current value of another field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRule {
    /// Name of the controlling field.
    pub field_name: String,
    /// Required value. An array means "all of these must be selected".
    pub value: Value,
}

impl DisplayRule {
    pub fn new(field_name: impl Into<String>, value: Value) -> Self {
        Self {
            field_name: field_name.into(),
            value,
        }
    }

    /// Compares the controlling field's current value with the required one.
    ///
    /// Array requirements are satisfied when the current value is an array
    /// containing every required element. Anything else needs strict equality,
    /// so `true` never matches `"true"`.
    pub fn is_satisfied_by(&self, current: &Value) -> bool {
        match &self.value {
            Value::Array(required) => match current {
                Value::Array(selected) => required.iter().all(|item| selected.contains(item)),
                _ => false,
            },
            expected => expected == current,
        }
    }
}
