use tracing::debug;

use crate::text::{narrow_form, wide_form};
use crate::{Decoding, FragmentBuffer, RuntimeError, Value};

/// The two text representations output can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    Narrow,
    Wide,
}

/// Result of coercing a buffer: every fragment is now of `kind`, and their
/// lengths (in bytes) sum to `total_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coerced {
    pub kind: TextKind,
    pub total_len: usize,
}

/// Turns a rendered value into text of the requested kind.
///
/// A filter asked for narrow text may answer with wide text; that promotes the
/// whole output to wide. Any other answer is a bug in the filter.
pub trait OutputFilter {
    fn transform(
        &self,
        value: Value,
        target: TextKind,
        decoding: Decoding,
    ) -> Result<Value, RuntimeError>;
}

impl<F> OutputFilter for F
where
    F: Fn(Value, TextKind, Decoding) -> Result<Value, RuntimeError>,
{
    fn transform(
        &self,
        value: Value,
        target: TextKind,
        decoding: Decoding,
    ) -> Result<Value, RuntimeError> {
        self(value, target, decoding)
    }
}

/// Plain stringification with no escaping.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCoercion;

impl OutputFilter for PlainCoercion {
    fn transform(
        &self,
        value: Value,
        target: TextKind,
        decoding: Decoding,
    ) -> Result<Value, RuntimeError> {
        match (target, value) {
            (TextKind::Narrow, value @ Value::Bytes(_)) => Ok(value),
            (TextKind::Narrow, value) => Ok(Value::Bytes(narrow_form(&value)?)),
            (TextKind::Wide, value @ Value::Text(_)) => Ok(value),
            (TextKind::Wide, value) => Ok(Value::Text(wide_form(&value, decoding)?)),
        }
    }
}

/// Coerce every fragment in place to a single text kind.
///
/// Fragments are first made narrow. The first wide fragment, whether present
/// in the buffer or produced by the filter, restarts the pass in wide mode from
/// that position; fragments already filtered in the narrow pass are only
/// decoded, never filtered twice. Fails on the first fragment that cannot be
/// coerced, leaving the buffer partially converted.
pub fn coerce_fragments(
    buffer: &mut FragmentBuffer,
    filter: &dyn OutputFilter,
    decoding: Decoding,
) -> Result<Coerced, RuntimeError> {
    let fragments = buffer.fragments_mut();
    let mut total_len = 0;
    for index in 0..fragments.len() {
        if matches!(fragments[index], Value::Text(_)) {
            debug!(position = index, "wide fragment found, promoting output");
            return promote_to_wide(fragments, index, filter, decoding);
        }
        let value = std::mem::take(&mut fragments[index]);
        match filter.transform(value, TextKind::Narrow, decoding)? {
            Value::Bytes(bytes) => {
                total_len += bytes.len();
                fragments[index] = Value::Bytes(bytes);
            }
            promoted @ Value::Text(_) => {
                debug!(position = index, "filter produced wide text, promoting output");
                fragments[index] = promoted;
                return promote_to_wide(fragments, index + 1, filter, decoding);
            }
            other => return Err(filter_violation(&other, TextKind::Narrow)),
        }
    }
    Ok(Coerced {
        kind: TextKind::Narrow,
        total_len,
    })
}

fn promote_to_wide(
    fragments: &mut [Value],
    filtered: usize,
    filter: &dyn OutputFilter,
    decoding: Decoding,
) -> Result<Coerced, RuntimeError> {
    let mut total_len = 0;
    for (index, slot) in fragments.iter_mut().enumerate() {
        let value = std::mem::take(slot);
        let wide = if index < filtered {
            decode_filtered(value, decoding)?
        } else {
            filter.transform(value, TextKind::Wide, decoding)?
        };
        match wide {
            Value::Text(text) => {
                total_len += text.len();
                *slot = Value::Text(text);
            }
            other => return Err(filter_violation(&other, TextKind::Wide)),
        }
    }
    Ok(Coerced {
        kind: TextKind::Wide,
        total_len,
    })
}

fn decode_filtered(value: Value, decoding: Decoding) -> Result<Value, RuntimeError> {
    match value {
        Value::Text(_) => Ok(value),
        Value::Bytes(bytes) => Ok(Value::text(decoding.decode(&bytes)?)),
        other => Err(filter_violation(&other, TextKind::Narrow)),
    }
}

fn filter_violation(produced: &Value, target: TextKind) -> RuntimeError {
    RuntimeError::InternalInvariant(format!(
        "output filter produced {} when asked for {target:?} text",
        produced.type_name()
    ))
}
