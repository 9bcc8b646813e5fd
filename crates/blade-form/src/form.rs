use serde_json::Value;

use crate::error::FormError;
use crate::events::ChangeQueue;
use crate::registry::{Registry, RegistryEntry};
use crate::spec::field::FieldDefinition;
use crate::spec::form::FormSchema;
use crate::visibility::{
    self, VisibilityChange, VisibilityMap, VisibilityMode, is_field_visible,
};
use crate::widget::{WidgetInput, build_widget};

/// Build-time knobs for a form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormOptions {
    pub visibility_mode: VisibilityMode,
}

/// A collapsible section and the names of the fields it holds, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionState {
    pub name: String,
    pub open: bool,
    pub fields: Vec<String>,
}

/// Announcement produced by a footer action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInvoked {
    pub label: String,
    pub message: String,
}

/// A schema built into live widgets.
///
/// Owns its registry, so independent forms never observe each other. All
/// mutation happens on the calling thread; the change queue makes the type
/// `!Send`.
#[derive(Debug)]
pub struct Form {
    blade_type: String,
    title: Option<String>,
    sections: Vec<SectionState>,
    footer: Vec<String>,
    registry: Registry,
    queue: ChangeQueue,
    options: FormOptions,
    sweeps: usize,
}

impl Form {
    pub fn build(schema: &FormSchema) -> Result<Self, FormError> {
        Self::build_with(schema, FormOptions::default())
    }

    /// Builds every section and field in schema order.
    ///
    /// Each field gets its initial visibility right after it is registered,
    /// from whatever is already registered at that point.
    pub fn build_with(schema: &FormSchema, options: FormOptions) -> Result<Self, FormError> {
        let mut form = Self {
            blade_type: schema.blade_type.clone(),
            title: schema.title.clone(),
            sections: Vec::with_capacity(schema.sections.len()),
            footer: schema.footer.clone(),
            registry: Registry::new(),
            queue: ChangeQueue::new(),
            options,
            sweeps: 0,
        };

        for (position, section) in schema.sections.iter().enumerate() {
            form.sections.push(SectionState {
                name: section.name.clone(),
                open: position == 0,
                fields: Vec::with_capacity(section.fields.len()),
            });
            for definition in &section.fields {
                form.add_field(position, definition)?;
            }
        }

        tracing::debug!(
            blade = %form.blade_type,
            fields = form.registry.len(),
            sections = form.sections.len(),
            "form built"
        );
        Ok(form)
    }

    fn add_field(&mut self, section: usize, definition: &FieldDefinition) -> Result<(), FormError> {
        let mut widget = build_widget(definition)?;
        widget.on_change(self.queue.listener());
        let position = self.registry.register(definition.clone(), widget)?;

        let visible = is_field_visible(definition, &self.registry);
        if let Some(entry) = self.registry.entry_at_mut(position) {
            entry.container_mut().set_hidden(!visible);
        }

        if let Some(state) = self.sections.get_mut(section) {
            state.fields.push(definition.field_name.clone());
        }
        Ok(())
    }

    pub fn blade_type(&self) -> &str {
        &self.blade_type
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn sections(&self) -> &[SectionState] {
        &self.sections
    }

    pub fn footer(&self) -> &[String] {
        &self.footer
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    /// Number of full sweeps run since the form was built.
    pub fn sweep_count(&self) -> usize {
        self.sweeps
    }

    pub fn field(&self, name: &str) -> Result<&RegistryEntry, FormError> {
        self.registry
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    pub fn value(&self, name: &str) -> Result<Value, FormError> {
        Ok(self.field(name)?.widget().value())
    }

    pub fn is_visible(&self, name: &str) -> Result<bool, FormError> {
        Ok(!self.field(name)?.container().is_hidden())
    }

    /// Names of visible fields in registration order.
    pub fn visible_fields(&self) -> Vec<&str> {
        self.registry
            .iter()
            .filter(|entry| !entry.container().is_hidden())
            .map(|entry| entry.definition().field_name.as_str())
            .collect()
    }

    pub fn visibility(&self) -> VisibilityMap {
        visibility::visibility_map(&self.registry)
    }

    /// Programmatic update; indistinguishable from the matching user edit.
    pub fn set_value(
        &mut self,
        name: &str,
        value: Value,
    ) -> Result<Vec<VisibilityChange>, FormError> {
        self.entry_mut(name)?.widget_mut().set_value(value)?;
        Ok(self.dispatch())
    }

    /// Feeds a user interaction to the named widget.
    pub fn apply_input(
        &mut self,
        name: &str,
        input: WidgetInput,
    ) -> Result<Vec<VisibilityChange>, FormError> {
        self.entry_mut(name)?.widget_mut().apply_input(input)?;
        Ok(self.dispatch())
    }

    /// Runs one full sweep regardless of pending changes.
    pub fn sweep(&mut self) -> Vec<VisibilityChange> {
        self.sweeps += 1;
        visibility::sweep(&mut self.registry, self.options.visibility_mode)
    }

    /// Drains pending change events, one full sweep per event.
    fn dispatch(&mut self) -> Vec<VisibilityChange> {
        let mut changes = Vec::new();
        while let Some(event) = self.queue.pop() {
            let swept = self.sweep();
            tracing::debug!(
                field = %event.field,
                changed = swept.len(),
                "visibility sweep"
            );
            changes.extend(swept);
        }
        changes
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut RegistryEntry, FormError> {
        self.registry
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Opens or closes a section; returns the new open state.
    pub fn toggle_section(&mut self, name: &str) -> Result<bool, FormError> {
        let section = self
            .sections
            .iter_mut()
            .find(|section| section.name == name)
            .ok_or_else(|| FormError::UnknownSection(name.to_string()))?;
        section.open = !section.open;
        Ok(section.open)
    }

    /// Footer actions only announce themselves.
    pub fn invoke_action(&self, label: &str) -> Result<ActionInvoked, FormError> {
        if !self.footer.iter().any(|action| action == label) {
            return Err(FormError::UnknownAction(label.to_string()));
        }
        let message = format!("{label} Blade");
        tracing::info!(blade = %self.blade_type, action = label, "{message}");
        Ok(ActionInvoked {
            label: label.to_string(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::rule::DisplayRule;
    use crate::spec::section::Section;
    use serde_json::json;

    fn schema(fields: Vec<FieldDefinition>) -> FormSchema {
        FormSchema {
            blade_type: "project".into(),
            title: None,
            sections: vec![
                Section {
                    name: "Details".into(),
                    fields,
                },
                Section {
                    name: "Delays".into(),
                    fields: vec![],
                },
            ],
            footer: vec!["Participants".into()],
        }
    }

    #[test]
    fn first_section_starts_open() {
        let mut form = Form::build(&schema(vec![])).expect("build");
        assert!(form.sections()[0].open);
        assert!(!form.sections()[1].open);

        assert!(form.toggle_section("Delays").expect("toggle"));
        assert!(!form.toggle_section("Details").expect("toggle"));
        assert_eq!(form.sweep_count(), 0);
        assert!(matches!(
            form.toggle_section("Nope"),
            Err(FormError::UnknownSection(_))
        ));
    }

    #[test]
    fn initial_visibility_only_sees_earlier_fields() {
        let form = Form::build(&schema(vec![
            FieldDefinition::new("Early", "string")
                .with_rule(DisplayRule::new("Late", json!(true))),
            FieldDefinition::new("Late", "toggle"),
        ]))
        .expect("build");
        assert!(form.is_visible("Early").expect("early"));

        let mut form = form;
        form.sweep();
        assert!(!form.is_visible("Early").expect("early"));
    }

    #[test]
    fn each_value_change_runs_one_sweep() {
        let mut form = Form::build(&schema(vec![
            FieldDefinition::new("Toggle", "toggle"),
            FieldDefinition::new("Name", "string"),
        ]))
        .expect("build");

        form.set_value("Name", json!("abc")).expect("set");
        assert_eq!(form.sweep_count(), 1);
        form.apply_input("Toggle", WidgetInput::Check(true))
            .expect("input");
        assert_eq!(form.sweep_count(), 2);
    }

    #[test]
    fn rejected_value_runs_no_sweep() {
        let mut form = Form::build(&schema(vec![FieldDefinition::new("Toggle", "toggle")]))
            .expect("build");
        assert!(form.set_value("Toggle", json!([1])).is_err());
        assert_eq!(form.sweep_count(), 0);
        assert!(matches!(
            form.set_value("Missing", json!(true)),
            Err(FormError::UnknownField(_))
        ));
    }

    #[test]
    fn footer_action_announces_itself() {
        let form = Form::build(&schema(vec![])).expect("build");
        let invoked = form.invoke_action("Participants").expect("action");
        assert_eq!(invoked.message, "Participants Blade");
        assert!(form.invoke_action("Billing").is_err());
    }
}
