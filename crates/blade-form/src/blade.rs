use crate::error::FormError;
use crate::form::{Form, FormOptions};
use crate::spec::form::SchemaSet;

/// A rendering context identified by its type attribute.
#[derive(Debug)]
pub struct Blade {
    blade_type: String,
    form: Option<Form>,
}

impl Blade {
    pub fn new(blade_type: impl Into<String>) -> Self {
        Self {
            blade_type: blade_type.into(),
            form: None,
        }
    }

    pub fn blade_type(&self) -> &str {
        &self.blade_type
    }

    /// The mounted form, if a schema matched.
    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut Form> {
        self.form.as_mut()
    }

    pub fn into_form(self) -> Option<Form> {
        self.form
    }
}

/// Builds a form into every blade whose type matches a schema.
///
/// Blades without a matching schema stay empty. The first build error aborts
/// the whole pass. Returns the number of blades that received a form.
pub fn mount_blades(
    schemas: &SchemaSet,
    blades: &mut [Blade],
    options: FormOptions,
) -> Result<usize, FormError> {
    let mut mounted = 0;
    for blade in blades.iter_mut() {
        let Some(schema) = schemas.find(&blade.blade_type) else {
            tracing::debug!(blade = %blade.blade_type, "no schema for blade; skipping");
            continue;
        };
        blade.form = Some(Form::build_with(schema, options)?);
        mounted += 1;
    }
    Ok(mounted)
}
