use crate::{Coerced, FragmentBuffer, RuntimeError, TextKind, Value};

/// Join a coerced buffer into one text value.
///
/// The output is allocated once at `coerced.total_len` and filled by copying
/// each fragment in order. Every fragment must already be of `coerced.kind`.
pub fn concatenate(buffer: &FragmentBuffer, coerced: Coerced) -> Result<Value, RuntimeError> {
    match coerced.kind {
        TextKind::Narrow => {
            let mut out = Vec::with_capacity(coerced.total_len);
            for fragment in buffer {
                match fragment {
                    Value::Bytes(bytes) => out.extend_from_slice(bytes),
                    other => return Err(mixed_fragment(other, coerced.kind)),
                }
            }
            debug_assert_eq!(out.len(), coerced.total_len);
            Ok(Value::Bytes(out.into()))
        }
        TextKind::Wide => {
            let mut out = String::with_capacity(coerced.total_len);
            for fragment in buffer {
                match fragment {
                    Value::Text(text) => out.push_str(text),
                    other => return Err(mixed_fragment(other, coerced.kind)),
                }
            }
            debug_assert_eq!(out.len(), coerced.total_len);
            Ok(Value::Text(out.into()))
        }
    }
}

fn mixed_fragment(fragment: &Value, kind: TextKind) -> RuntimeError {
    RuntimeError::InternalInvariant(format!(
        "{} fragment in {kind:?} output",
        fragment.type_name()
    ))
}
