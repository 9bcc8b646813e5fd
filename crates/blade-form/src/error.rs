use thiserror::Error;

/// Failures raised while building or driving a form.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("field '{field}' has unsupported type '{kind}'")]
    UnsupportedFieldType { field: String, kind: String },
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
    #[error("field '{field}' expects {expected}, got {found}")]
    ValueMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },
    #[error("input {input} does not apply to {kind} field '{field}'")]
    UnsupportedInput {
        field: String,
        kind: &'static str,
        input: &'static str,
    },
    #[error("field '{0}' is not registered")]
    UnknownField(String),
    #[error("section '{0}' does not exist")]
    UnknownSection(String),
    #[error("footer action '{0}' does not exist")]
    UnknownAction(String),
    #[error("failed to parse schema: {0}")]
    SchemaParse(#[source] serde_json::Error),
    #[error("failed to read schema {path}: {source}")]
    SchemaRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
