use thiserror::Error;

use crate::Value;

/// Why a name, key or member could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupFailure {
    #[error("key not found: {key:?}")]
    MissingKey { key: String },
    #[error("{type_name} value has no member `{name}`")]
    MissingAttribute { type_name: String, name: String },
    #[error("name `{name}` is not defined")]
    MissingName { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupFailure),
    #[error("cannot coerce {type_name} to text: {detail}")]
    TypeCoercion { type_name: String, detail: String },
    #[error("expected a sequence of length {expected}, got {found}")]
    SequenceArity { expected: usize, found: usize },
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("{context}: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: String,
        context: String,
    },
    #[error("{0}")]
    Raised(String),
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl RuntimeError {
    /// An error raised by user code (custom objects, native functions).
    pub fn raised(message: impl Into<String>) -> Self {
        RuntimeError::Raised(message.into())
    }

    pub(crate) fn mismatch(expected: &str, found: &Value, context: &str) -> Self {
        RuntimeError::TypeMismatch {
            expected: expected.to_string(),
            found: found.type_name().to_string(),
            context: context.to_string(),
        }
    }
}
