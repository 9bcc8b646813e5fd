//! Field widgets: one variant per field type behind a uniform value and
//! change contract.
//!
//! `set_value` and `apply_input` both end in the same change notification,
//! so a programmatic update is indistinguishable from a user edit for
//! whoever listens. Widgets never evaluate visibility themselves.

pub mod select;
pub mod text;
pub mod toggle;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::FormError;
use crate::events::ChangeListener;
use crate::spec::field::{FieldDefinition, FieldType};

pub use select::{MultiSelectWidget, SingleSelectWidget};
pub use text::{DateWidget, TextWidget};
pub use toggle::ToggleWidget;

/// Shown by a multi-select when nothing is selected.
pub const EMPTY_SELECTION_SUMMARY: &str = "Select options";

/// User-driven edits a widget can receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetInput {
    /// Typed text, or a picked date for date inputs.
    Text(String),
    /// Option chosen in a single-select.
    Pick(String),
    /// Click on a multi-select item, flipping its selection.
    ToggleOption(String),
    /// Switch flipped to the given state.
    Check(bool),
    /// Click on the multi-select summary, opening or closing the dropdown.
    OpenDropdown,
    /// Click anywhere outside the multi-select.
    DismissDropdown,
}

impl WidgetInput {
    pub fn label(&self) -> &'static str {
        match self {
            WidgetInput::Text(_) => "text",
            WidgetInput::Pick(_) => "pick",
            WidgetInput::ToggleOption(_) => "toggle-option",
            WidgetInput::Check(_) => "check",
            WidgetInput::OpenDropdown => "open-dropdown",
            WidgetInput::DismissDropdown => "dismiss-dropdown",
        }
    }
}

/// One selectable entry as currently displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

/// Visual state of a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum WidgetView {
    TextInput {
        value: String,
    },
    DateInput {
        value: String,
    },
    Select {
        selected: String,
        options: Vec<OptionView>,
    },
    MultiSelect {
        summary: String,
        expanded: bool,
        items: Vec<OptionView>,
    },
    Switch {
        checked: bool,
    },
}

/// Capability set shared by every field widget.
pub trait FieldWidget: fmt::Debug {
    fn name(&self) -> &str;

    fn field_type(&self) -> FieldType;

    fn render(&self) -> WidgetView;

    /// Current value in the variant's natural JSON shape.
    fn value(&self) -> Value;

    /// Updates value and visual state, then notifies exactly like a user edit.
    fn set_value(&mut self, value: Value) -> Result<(), FormError>;

    fn apply_input(&mut self, input: WidgetInput) -> Result<(), FormError>;

    /// Registers the one change listener; a later call replaces it.
    fn on_change(&mut self, listener: ChangeListener);
}

/// Builds the widget variant matching the definition's type tag.
pub fn build_widget(definition: &FieldDefinition) -> Result<Box<dyn FieldWidget>, FormError> {
    let kind = definition
        .field_type()
        .ok_or_else(|| FormError::UnsupportedFieldType {
            field: definition.field_name.clone(),
            kind: definition.kind.clone(),
        })?;

    let widget: Box<dyn FieldWidget> = match kind {
        FieldType::Text => Box::new(TextWidget::new(definition)),
        FieldType::Date => Box::new(DateWidget::new(definition)),
        FieldType::SingleSelect => Box::new(SingleSelectWidget::new(definition)),
        FieldType::MultiSelect => Box::new(MultiSelectWidget::new(definition)),
        FieldType::Toggle => Box::new(ToggleWidget::new(definition)),
    };
    Ok(widget)
}

pub(crate) fn json_kind(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

/// Scalars are stringified the way an input element would; containers are rejected.
pub(crate) fn coerce_text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(json_kind(other)),
    }
}

pub(crate) fn unsupported_input(
    field: &str,
    kind: FieldType,
    input: &WidgetInput,
) -> FormError {
    FormError::UnsupportedInput {
        field: field.to_string(),
        kind: kind.as_tag(),
        input: input.label(),
    }
}
