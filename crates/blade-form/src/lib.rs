pub mod blade;
pub mod error;
pub mod events;
pub mod form;
pub mod registry;
pub mod render;
pub mod spec;
pub mod visibility;
pub mod widget;

pub use blade::{Blade, mount_blades};
pub use error::FormError;
pub use events::{ChangeEvent, ChangeListener, ChangeQueue};
pub use form::{ActionInvoked, Form, FormOptions, SectionState};
pub use registry::{FieldContainer, Registry, RegistryEntry};
pub use render::{render_json_ui, render_text};
pub use spec::{
    DisplayRule, FieldDefinition, FieldType, FormSchema, SchemaSet, Section, SelectOption,
    schema_document,
};
pub use visibility::{
    VisibilityChange, VisibilityMap, VisibilityMode, is_field_visible, sweep,
};
pub use widget::{FieldWidget, WidgetInput, WidgetView, build_widget};
