use std::cmp::Ordering;
use std::rc::Rc;

use crate::truth::canonical_bool;
use crate::{Decoding, RuntimeError, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `left in right`
    In,
    NotIn,
    /// `left is right`
    Is,
    IsNot,
}

/// Compare two values, returning one of the canonical booleans.
///
/// Equality and identity never fail; values of unrelated types are simply
/// unequal. Ordering is defined for numbers, text and same-kind sequences.
/// Containment tests whether `left` is found in `right`.
pub fn compare(
    op: CompareOp,
    left: &Value,
    right: &Value,
) -> Result<&'static Value, RuntimeError> {
    let outcome = match op {
        CompareOp::Eq => values_equal(left, right),
        CompareOp::Ne => !values_equal(left, right),
        CompareOp::Lt => order_values(left, right)?.is_some_and(Ordering::is_lt),
        CompareOp::Le => order_values(left, right)?.is_some_and(Ordering::is_le),
        CompareOp::Gt => order_values(left, right)?.is_some_and(Ordering::is_gt),
        CompareOp::Ge => order_values(left, right)?.is_some_and(Ordering::is_ge),
        CompareOp::In => contains(right, left)?,
        CompareOp::NotIn => !contains(right, left)?,
        CompareOp::Is => values_identical(left, right),
        CompareOp::IsNot => !values_identical(left, right),
    };
    Ok(canonical_bool(outcome))
}

pub fn values_equal(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (as_number(left), as_number(right)) {
        return a.compare_to(b) == Some(Ordering::Equal);
    }
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Bytes(a), Value::Bytes(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Bytes(bytes), Value::Text(text)) | (Value::Text(text), Value::Bytes(bytes)) => {
            std::str::from_utf8(bytes).is_ok_and(|decoded| decoded == &**text)
        }
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Object(a), Value::Object(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
        _ => false,
    }
}

/// Whether both handles refer to the same value. Shared payloads compare by
/// address; scalars, which have no separate identity, compare by value.
pub fn values_identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
        (Value::Bytes(a), Value::Bytes(b)) => Rc::ptr_eq(a, b),
        (Value::Text(a), Value::Text(b)) => Rc::ptr_eq(a, b),
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b),
        (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Object(a), Value::Object(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
        _ => false,
    }
}

/// Membership of `item` in `container`: element equality for sequences,
/// substring search for text, key presence for maps.
fn contains(container: &Value, item: &Value) -> Result<bool, RuntimeError> {
    match (container, item) {
        (Value::List(items), _) | (Value::Tuple(items), _) => {
            Ok(items.iter().any(|candidate| values_equal(candidate, item)))
        }
        (Value::Bytes(haystack), Value::Bytes(needle)) => Ok(contains_bytes(haystack, needle)),
        (Value::Text(haystack), Value::Text(needle)) => Ok(haystack.contains(&**needle)),
        (Value::Bytes(haystack), Value::Text(needle)) => {
            Ok(Decoding::Utf8.decode(haystack)?.contains(&**needle))
        }
        (Value::Text(haystack), Value::Bytes(needle)) => {
            Ok(haystack.contains(Decoding::Utf8.decode(needle)?.as_str()))
        }
        (Value::Bytes(_) | Value::Text(_), other) => Err(RuntimeError::TypeMismatch {
            expected: "text".to_string(),
            found: other.type_name().to_string(),
            context: "substring test".to_string(),
        }),
        (Value::Map(map), key) => Ok(key.as_key().is_some_and(|key| map.contains_key(key))),
        (Value::Object(object), item) => object
            .contains(item)
            .unwrap_or_else(|| Err(not_a_container(container))),
        _ => Err(not_a_container(container)),
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

fn not_a_container(container: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected: "container".to_string(),
        found: container.type_name().to_string(),
        context: "membership test".to_string(),
    }
}

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn compare_to(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (Number::Int(a), Number::Float(b)) => compare_int_float(a, b),
            (Number::Float(a), Number::Int(b)) => compare_int_float(b, a).map(Ordering::reverse),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
        }
    }
}

/// Exact ordering of an integer against a float, without rounding the
/// integer through `f64`.
fn compare_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, exactly representable
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if float.is_nan() {
        return None;
    }
    if float >= BOUND {
        return Some(Ordering::Less);
    }
    if float < -BOUND {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)),
        unequal => Some(unequal),
    }
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Bool(flag) => Some(Number::Int(i64::from(*flag))),
        Value::Int(value) => Some(Number::Int(*value)),
        Value::Float(value) => Some(Number::Float(*value)),
        _ => None,
    }
}

/// `None` when the values are unordered (NaN).
fn order_values(left: &Value, right: &Value) -> Result<Option<Ordering>, RuntimeError> {
    if let (Some(a), Some(b)) = (as_number(left), as_number(right)) {
        return Ok(a.compare_to(b));
    }
    match (left, right) {
        (Value::Bytes(a), Value::Bytes(b)) => Ok(Some(a.cmp(b))),
        (Value::Text(a), Value::Text(b)) => Ok(Some(a.cmp(b))),
        (Value::Bytes(a), Value::Text(b)) => {
            Ok(Some(<str as Ord>::cmp(&String::from_utf8_lossy(a), b)))
        }
        (Value::Text(a), Value::Bytes(b)) => {
            Ok(Some(<str as Ord>::cmp(a, &String::from_utf8_lossy(b))))
        }
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                if !values_equal(x, y) {
                    return order_values(x, y);
                }
            }
            Ok(Some(a.len().cmp(&b.len())))
        }
        _ => Err(RuntimeError::TypeMismatch {
            expected: "comparable values".to_string(),
            found: format!("{} and {}", left.type_name(), right.type_name()),
            context: "ordering comparison".to_string(),
        }),
    }
}
