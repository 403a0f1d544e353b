use tracing::trace;

use crate::{LookupFailure, RuntimeError, Value};

/// `container[subscript]`.
///
/// Lists indexed by integers take a direct path with negative-index
/// wraparound. Everything else, including out-of-range fast-path indices, goes
/// through the generic access below.
pub fn get_index(container: &Value, subscript: &Value) -> Result<Value, RuntimeError> {
    if let (Value::List(items), Value::Int(index)) = (container, subscript) {
        let len = items.len() as i64;
        let wrapped = if *index < 0 { index + len } else { *index };
        if (0..len).contains(&wrapped) {
            return Ok(items[wrapped as usize].clone());
        }
        trace!(index, len, "list index out of range, using generic access");
    }
    generic_index(container, subscript)
}

fn generic_index(container: &Value, subscript: &Value) -> Result<Value, RuntimeError> {
    match container {
        Value::List(items) | Value::Tuple(items) => {
            let position = wrap_index(expect_index(subscript)?, items.len())?;
            Ok(items[position].clone())
        }
        Value::Text(text) => {
            let index = expect_index(subscript)?;
            let position = wrap_index(index, text.chars().count())?;
            let ch = text
                .chars()
                .nth(position)
                .ok_or_else(|| RuntimeError::InternalInvariant("char index".to_string()))?;
            Ok(Value::text(ch.encode_utf8(&mut [0; 4])))
        }
        Value::Bytes(bytes) => {
            let position = wrap_index(expect_index(subscript)?, bytes.len())?;
            Ok(Value::bytes(&bytes[position..=position]))
        }
        Value::Map(map) => {
            let key = subscript
                .as_key()
                .ok_or_else(|| RuntimeError::mismatch("text key", subscript, "map access"))?;
            map.get(key).cloned().ok_or_else(|| {
                LookupFailure::MissingKey {
                    key: key.to_string(),
                }
                .into()
            })
        }
        Value::Object(object) => object.get_item(subscript),
        other => Err(RuntimeError::mismatch(
            "subscriptable value",
            other,
            "indexed access",
        )),
    }
}

fn expect_index(subscript: &Value) -> Result<i64, RuntimeError> {
    match subscript {
        Value::Int(index) => Ok(*index),
        Value::Bool(flag) => Ok(i64::from(*flag)),
        other => Err(RuntimeError::mismatch("integer index", other, "indexed access")),
    }
}

fn wrap_index(index: i64, len: usize) -> Result<usize, RuntimeError> {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let wrapped = if index < 0 { index + signed_len } else { index };
    if wrapped < 0 || wrapped >= signed_len {
        return Err(RuntimeError::IndexOutOfRange { index, len });
    }
    Ok(wrapped as usize)
}
