use std::collections::BTreeMap;

use crate::error::FormError;
use crate::spec::field::FieldDefinition;
use crate::widget::FieldWidget;

/// Rendered wrapper around one field; its hidden flag is what visibility
/// evaluation ultimately controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldContainer {
    pub label: String,
    pub mandatory: bool,
    hidden: bool,
}

impl FieldContainer {
    pub fn new(label: impl Into<String>, mandatory: bool) -> Self {
        Self {
            label: label.into(),
            mandatory,
            hidden: false,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns whether the state actually flipped.
    pub fn set_hidden(&mut self, hidden: bool) -> bool {
        let changed = self.hidden != hidden;
        self.hidden = hidden;
        changed
    }
}

/// A live widget paired with its container and the definition it was built from.
#[derive(Debug)]
pub struct RegistryEntry {
    definition: FieldDefinition,
    widget: Box<dyn FieldWidget>,
    container: FieldContainer,
}

impl RegistryEntry {
    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    pub fn widget(&self) -> &dyn FieldWidget {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> &mut dyn FieldWidget {
        self.widget.as_mut()
    }

    pub fn container(&self) -> &FieldContainer {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut FieldContainer {
        &mut self.container
    }
}

/// Flat name -> entry map for one form, iterated in registration order.
///
/// Entries are only ever added; there is no removal or replacement.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: BTreeMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a built widget and returns its position in iteration order.
    pub fn register(
        &mut self,
        definition: FieldDefinition,
        widget: Box<dyn FieldWidget>,
    ) -> Result<usize, FormError> {
        if self.index.contains_key(&definition.field_name) {
            return Err(FormError::DuplicateField(definition.field_name));
        }
        let position = self.entries.len();
        let container = FieldContainer::new(definition.field_name.clone(), definition.mandatory);
        self.index.insert(definition.field_name.clone(), position);
        self.entries.push(RegistryEntry {
            definition,
            widget,
            container,
        });
        Ok(position)
    }

    /// Unknown names are simply absent; callers decide what that means.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.index.get(name).map(|position| &self.entries[*position])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RegistryEntry> {
        let position = *self.index.get(name)?;
        self.entries.get_mut(position)
    }

    pub fn entry_at(&self, position: usize) -> Option<&RegistryEntry> {
        self.entries.get(position)
    }

    pub fn entry_at_mut(&mut self, position: usize) -> Option<&mut RegistryEntry> {
        self.entries.get_mut(position)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
