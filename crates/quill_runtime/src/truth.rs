use crate::{RuntimeError, Value};

thread_local! {
    static TRUE: &'static Value = Box::leak(Box::new(Value::Bool(true)));
    static FALSE: &'static Value = Box::leak(Box::new(Value::Bool(false)));
}

/// The shared boolean value for `truth`. Every call on a thread returns the
/// same instance, so results can be compared by identity.
pub fn canonical_bool(truth: bool) -> &'static Value {
    if truth {
        TRUE.with(|value| *value)
    } else {
        FALSE.with(|value| *value)
    }
}

pub fn coerce_bool(value: &Value) -> Result<&'static Value, RuntimeError> {
    Ok(canonical_bool(value.is_truthy()?))
}

pub fn not_value(value: &Value) -> Result<&'static Value, RuntimeError> {
    Ok(canonical_bool(!value.is_truthy()?))
}
