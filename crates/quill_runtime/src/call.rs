use crate::{RuntimeError, Value};

/// Invoke `callable` with positional and keyword arguments.
pub fn call(
    callable: &Value,
    args: &[Value],
    kwargs: &[(String, Value)],
) -> Result<Value, RuntimeError> {
    match callable {
        Value::Function(function) => function.invoke(args, kwargs),
        Value::Object(object) => object.call(args, kwargs),
        other => Err(RuntimeError::mismatch("callable", other, "call")),
    }
}
