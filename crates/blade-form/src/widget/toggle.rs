use serde_json::Value;

use crate::error::FormError;
use crate::events::{ChangeListener, ChangeNotifier};
use crate::spec::field::{FieldDefinition, FieldType};
use crate::widget::{FieldWidget, WidgetInput, WidgetView, json_kind, unsupported_input};

/// On/off switch.
#[derive(Debug)]
pub struct ToggleWidget {
    name: String,
    checked: bool,
    notifier: ChangeNotifier,
}

impl ToggleWidget {
    pub fn new(definition: &FieldDefinition) -> Self {
        Self {
            name: definition.field_name.clone(),
            checked: definition.field_value.as_ref().is_some_and(truthy),
            notifier: ChangeNotifier::default(),
        }
    }

    fn commit(&mut self, checked: bool) {
        self.checked = checked;
        self.notifier.notify(&self.name, self.value());
    }
}

impl FieldWidget for ToggleWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn field_type(&self) -> FieldType {
        FieldType::Toggle
    }

    fn render(&self) -> WidgetView {
        WidgetView::Switch {
            checked: self.checked,
        }
    }

    fn value(&self) -> Value {
        Value::Bool(self.checked)
    }

    fn set_value(&mut self, value: Value) -> Result<(), FormError> {
        match value {
            Value::Bool(checked) => self.commit(checked),
            Value::Null => self.commit(false),
            other => {
                return Err(FormError::ValueMismatch {
                    field: self.name.clone(),
                    expected: "a boolean",
                    found: json_kind(&other),
                });
            }
        }
        Ok(())
    }

    fn apply_input(&mut self, input: WidgetInput) -> Result<(), FormError> {
        match input {
            WidgetInput::Check(checked) => {
                self.commit(checked);
                Ok(())
            }
            other => Err(unsupported_input(&self.name, FieldType::Toggle, &other)),
        }
    }

    fn on_change(&mut self, listener: ChangeListener) {
        self.notifier.register(listener);
    }
}

// Schema defaults follow loose truthiness; set_value itself is strict.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
