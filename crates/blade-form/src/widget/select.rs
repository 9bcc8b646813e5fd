use serde_json::Value;

use crate::error::FormError;
use crate::events::{ChangeListener, ChangeNotifier};
use crate::spec::field::{FieldDefinition, FieldType, SelectOption};
use crate::widget::{
    EMPTY_SELECTION_SUMMARY, FieldWidget, OptionView, WidgetInput, WidgetView, coerce_text,
    json_kind, unsupported_input,
};

/// Dropdown with exactly one (or no) selected option.
#[derive(Debug)]
pub struct SingleSelectWidget {
    name: String,
    options: Vec<SelectOption>,
    selected: Option<usize>,
    notifier: ChangeNotifier,
}

impl SingleSelectWidget {
    pub fn new(definition: &FieldDefinition) -> Self {
        let options = definition.options.clone();
        let selected = definition
            .field_value
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|value| position_of(&options, value));
        Self {
            name: definition.field_name.clone(),
            options,
            selected,
            notifier: ChangeNotifier::default(),
        }
    }

    fn selected_value(&self) -> String {
        self.selected
            .and_then(|index| self.options.get(index))
            .map(|option| option.value.clone())
            .unwrap_or_default()
    }

    /// A value matching no option leaves the select empty.
    fn commit(&mut self, value: &str) {
        self.selected = position_of(&self.options, value);
        self.notifier.notify(&self.name, self.value());
    }
}

impl FieldWidget for SingleSelectWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn field_type(&self) -> FieldType {
        FieldType::SingleSelect
    }

    fn render(&self) -> WidgetView {
        WidgetView::Select {
            selected: self.selected_value(),
            options: self
                .options
                .iter()
                .enumerate()
                .map(|(index, option)| option_view(option, self.selected == Some(index)))
                .collect(),
        }
    }

    fn value(&self) -> Value {
        Value::String(self.selected_value())
    }

    /// Numbers and booleans select the option with the same text.
    fn set_value(&mut self, value: Value) -> Result<(), FormError> {
        let choice = coerce_text(&value).map_err(|found| FormError::ValueMismatch {
            field: self.name.clone(),
            expected: "an option value",
            found,
        })?;
        self.commit(&choice);
        Ok(())
    }

    fn apply_input(&mut self, input: WidgetInput) -> Result<(), FormError> {
        match input {
            WidgetInput::Pick(choice) => {
                self.commit(&choice);
                Ok(())
            }
            other => Err(unsupported_input(&self.name, FieldType::SingleSelect, &other)),
        }
    }

    fn on_change(&mut self, listener: ChangeListener) {
        self.notifier.register(listener);
    }
}

/// Dropdown of checkable items with a summary line of the current selection.
#[derive(Debug)]
pub struct MultiSelectWidget {
    name: String,
    options: Vec<SelectOption>,
    selected: Vec<bool>,
    expanded: bool,
    summary: String,
    notifier: ChangeNotifier,
}

impl MultiSelectWidget {
    pub fn new(definition: &FieldDefinition) -> Self {
        let options = definition.options.clone();
        let initial = definition
            .field_value
            .as_ref()
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();
        let selected = options
            .iter()
            .map(|option| initial.contains(&option.value.as_str()))
            .collect();
        let mut widget = Self {
            name: definition.field_name.clone(),
            options,
            selected,
            expanded: false,
            summary: String::new(),
            notifier: ChangeNotifier::default(),
        };
        widget.refresh_summary();
        widget
    }

    /// Human-readable list of selected labels.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    fn selected_values(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(option, _)| option.value.clone())
            .collect()
    }

    fn refresh_summary(&mut self) {
        let labels = self
            .options
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(option, _)| option.label.as_str())
            .collect::<Vec<_>>();
        self.summary = if labels.is_empty() {
            EMPTY_SELECTION_SUMMARY.to_string()
        } else {
            labels.join(", ")
        };
    }

    fn commit(&mut self) {
        self.refresh_summary();
        self.notifier.notify(&self.name, self.value());
    }
}

impl FieldWidget for MultiSelectWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn field_type(&self) -> FieldType {
        FieldType::MultiSelect
    }

    fn render(&self) -> WidgetView {
        WidgetView::MultiSelect {
            summary: self.summary.clone(),
            expanded: self.expanded,
            items: self
                .options
                .iter()
                .zip(&self.selected)
                .map(|(option, selected)| option_view(option, *selected))
                .collect(),
        }
    }

    fn value(&self) -> Value {
        Value::Array(
            self.selected_values()
                .into_iter()
                .map(Value::String)
                .collect(),
        )
    }

    /// Values that match no option are dropped.
    fn set_value(&mut self, value: Value) -> Result<(), FormError> {
        let wanted = match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Array(_) | Value::Object(_) => Err(json_kind(item)),
                    scalar => coerce_text(scalar),
                })
                .collect::<Result<Vec<_>, _>>(),
            Value::Null => Ok(Vec::new()),
            other => Err(json_kind(&other)),
        }
        .map_err(|found| FormError::ValueMismatch {
            field: self.name.clone(),
            expected: "an array of option values",
            found,
        })?;

        for (option, selected) in self.options.iter().zip(self.selected.iter_mut()) {
            *selected = wanted.contains(&option.value);
        }
        self.commit();
        Ok(())
    }

    fn apply_input(&mut self, input: WidgetInput) -> Result<(), FormError> {
        match input {
            WidgetInput::ToggleOption(choice) => {
                let index = position_of(&self.options, &choice).ok_or_else(|| {
                    FormError::ValueMismatch {
                        field: self.name.clone(),
                        expected: "a known option value",
                        found: choice.clone(),
                    }
                })?;
                self.selected[index] = !self.selected[index];
                self.commit();
                Ok(())
            }
            WidgetInput::OpenDropdown => {
                self.expanded = !self.expanded;
                Ok(())
            }
            WidgetInput::DismissDropdown => {
                self.expanded = false;
                Ok(())
            }
            other => Err(unsupported_input(&self.name, FieldType::MultiSelect, &other)),
        }
    }

    fn on_change(&mut self, listener: ChangeListener) {
        self.notifier.register(listener);
    }
}

fn position_of(options: &[SelectOption], value: &str) -> Option<usize> {
    options.iter().position(|option| option.value == value)
}

fn option_view(option: &SelectOption, selected: bool) -> OptionView {
    OptionView {
        label: option.label.clone(),
        value: option.value.clone(),
        selected,
    }
}
