use crate::{RuntimeError, Value};

/// The items a `for` loop over `value` visits.
///
/// Maps yield their keys as narrow text; text yields one-character strings
/// of the same width.
pub fn iterate(value: &Value) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::List(items) | Value::Tuple(items) => Ok(items.to_vec()),
        Value::Text(text) => Ok(text
            .chars()
            .map(|ch| Value::text(ch.encode_utf8(&mut [0; 4])))
            .collect()),
        Value::Bytes(bytes) => Ok(bytes.iter().map(|byte| Value::bytes([*byte])).collect()),
        Value::Map(map) => Ok(map.keys().map(Value::bytes).collect()),
        Value::Object(object) => object
            .iterate()
            .unwrap_or_else(|| Err(RuntimeError::mismatch("iterable", value, "iteration"))),
        other => Err(RuntimeError::mismatch("iterable", other, "iteration")),
    }
}

/// Destructure `value` into exactly `arity` items.
pub fn unpack(value: &Value, arity: usize) -> Result<Vec<Value>, RuntimeError> {
    let items = iterate(value)?;
    if items.len() != arity {
        return Err(RuntimeError::SequenceArity {
            expected: arity,
            found: items.len(),
        });
    }
    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn text_iterates_by_character() {
        let items = iterate(&Value::text("hé")).unwrap();
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[1], Value::Text(t) if &**t == "é"));
    }

    #[test]
    fn maps_iterate_keys_in_order() {
        let map = Value::map([("b", Value::None), ("a", Value::None)]);
        let keys = iterate(&map).unwrap();
        assert!(matches!(&keys[0], Value::Bytes(k) if &k[..] == b"b"));
    }

    #[test]
    fn unpack_checks_arity() {
        let pair = Value::tuple(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(unpack(&pair, 2).unwrap().len(), 2);
        assert_eq!(
            unpack(&pair, 3).unwrap_err(),
            RuntimeError::SequenceArity {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn scalars_are_not_iterable() {
        assert!(matches!(
            iterate(&Value::Int(4)),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }
}
