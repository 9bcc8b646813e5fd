use chrono::NaiveDate;
use serde_json::Value;

use crate::error::FormError;
use crate::events::{ChangeListener, ChangeNotifier};
use crate::spec::field::{FieldDefinition, FieldType};
use crate::widget::{
    FieldWidget, WidgetInput, WidgetView, coerce_text, json_kind, unsupported_input,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Free text input.
#[derive(Debug)]
pub struct TextWidget {
    name: String,
    value: String,
    notifier: ChangeNotifier,
}

impl TextWidget {
    pub fn new(definition: &FieldDefinition) -> Self {
        let value = definition
            .field_value
            .as_ref()
            .and_then(|value| coerce_text(value).ok())
            .unwrap_or_default();
        Self {
            name: definition.field_name.clone(),
            value,
            notifier: ChangeNotifier::default(),
        }
    }

    fn commit(&mut self, text: String) {
        self.value = text;
        self.notifier.notify(&self.name, self.value());
    }
}

impl FieldWidget for TextWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn field_type(&self) -> FieldType {
        FieldType::Text
    }

    fn render(&self) -> WidgetView {
        WidgetView::TextInput {
            value: self.value.clone(),
        }
    }

    fn value(&self) -> Value {
        Value::String(self.value.clone())
    }

    fn set_value(&mut self, value: Value) -> Result<(), FormError> {
        let text = coerce_text(&value).map_err(|found| FormError::ValueMismatch {
            field: self.name.clone(),
            expected: "text",
            found,
        })?;
        self.commit(text);
        Ok(())
    }

    fn apply_input(&mut self, input: WidgetInput) -> Result<(), FormError> {
        match input {
            WidgetInput::Text(text) => {
                self.commit(text);
                Ok(())
            }
            other => Err(unsupported_input(&self.name, FieldType::Text, &other)),
        }
    }

    fn on_change(&mut self, listener: ChangeListener) {
        self.notifier.register(listener);
    }
}

/// Calendar date input holding an ISO `YYYY-MM-DD` string or nothing.
#[derive(Debug)]
pub struct DateWidget {
    name: String,
    date: Option<NaiveDate>,
    notifier: ChangeNotifier,
}

impl DateWidget {
    pub fn new(definition: &FieldDefinition) -> Self {
        let date = definition
            .field_value
            .as_ref()
            .and_then(Value::as_str)
            .and_then(parse_date);
        Self {
            name: definition.field_name.clone(),
            date,
            notifier: ChangeNotifier::default(),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn iso(&self) -> String {
        self.date
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Unparsable text clears the input, as a native date picker does.
    fn commit(&mut self, raw: &str) {
        self.date = parse_date(raw);
        self.notifier.notify(&self.name, self.value());
    }
}

impl FieldWidget for DateWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn field_type(&self) -> FieldType {
        FieldType::Date
    }

    fn render(&self) -> WidgetView {
        WidgetView::DateInput { value: self.iso() }
    }

    fn value(&self) -> Value {
        Value::String(self.iso())
    }

    fn set_value(&mut self, value: Value) -> Result<(), FormError> {
        match value {
            Value::String(raw) => self.commit(&raw),
            Value::Null => self.commit(""),
            other => {
                return Err(FormError::ValueMismatch {
                    field: self.name.clone(),
                    expected: "an ISO date string",
                    found: json_kind(&other),
                });
            }
        }
        Ok(())
    }

    fn apply_input(&mut self, input: WidgetInput) -> Result<(), FormError> {
        match input {
            WidgetInput::Text(raw) => {
                self.commit(&raw);
                Ok(())
            }
            other => Err(unsupported_input(&self.name, FieldType::Date, &other)),
        }
    }

    fn on_change(&mut self, listener: ChangeListener) {
        self.notifier.register(listener);
    }
}

/// Only the zero-padded `YYYY-MM-DD` form is a date; anything else is empty.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let padded = raw.len() == 10
        && raw.bytes().enumerate().all(|(index, byte)| match index {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !padded {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}
