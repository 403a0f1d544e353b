//! Generic stringification of values into narrow or wide text.

use std::fmt::Write as _;
use std::rc::Rc;

use crate::{Decoding, RuntimeError, Value};

/// The narrow text form of any value.
pub fn narrow_form(value: &Value) -> Result<Rc<[u8]>, RuntimeError> {
    match value {
        Value::Bytes(bytes) => Ok(Rc::clone(bytes)),
        Value::Text(text) => Ok(Rc::from(text.as_bytes())),
        Value::Object(object) => Ok(Rc::from(object.to_narrow()?)),
        other => Ok(Rc::from(format_value(other)?.into_bytes())),
    }
}

/// The wide text form of any value. Narrow text is decoded with `decoding`.
pub fn wide_form(value: &Value, decoding: Decoding) -> Result<Rc<str>, RuntimeError> {
    match value {
        Value::Text(text) => Ok(Rc::clone(text)),
        Value::Bytes(bytes) => Ok(Rc::from(decoding.decode(bytes)?)),
        Value::Object(object) => Ok(Rc::from(object.to_wide(decoding)?)),
        other => Ok(Rc::from(format_value(other)?)),
    }
}

/// Human-readable rendering, as produced by output interpolation.
pub fn format_value(value: &Value) -> Result<String, RuntimeError> {
    Ok(match value {
        Value::None => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(value) => value.to_string(),
        Value::Float(value) => format_float(*value),
        Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Value::Text(text) => text.to_string(),
        Value::List(items) => format!("[{}]", repr_items(items)?),
        Value::Tuple(items) if items.len() == 1 => format!("({},)", repr_items(items)?),
        Value::Tuple(items) => format!("({})", repr_items(items)?),
        Value::Map(map) => {
            let mut out = String::from("{");
            for (index, (key, value)) in map.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                out.push_str(&quote_text(key));
                out.push_str(": ");
                out.push_str(&repr(value)?);
            }
            out.push('}');
            out
        }
        Value::Function(function) => format!("<function {}>", function.name()),
        Value::Object(object) => String::from_utf8_lossy(&object.to_narrow()?).into_owned(),
    })
}

/// Like [`format_value`], but text is quoted and escaped.
pub fn repr(value: &Value) -> Result<String, RuntimeError> {
    match value {
        Value::Bytes(bytes) => Ok(quote_bytes(bytes)),
        Value::Text(text) => Ok(quote_text(text)),
        other => format_value(other),
    }
}

fn repr_items(items: &[Value]) -> Result<String, RuntimeError> {
    Ok(items
        .iter()
        .map(repr)
        .collect::<Result<Vec<_>, _>>()?
        .join(", "))
}

const FLOAT_DIGITS: usize = 12;

/// Twelve significant digits, switching to an exponent outside `1e-4..1e12`.
/// Results without a fraction or exponent get `.0` appended.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return (if value > 0.0 { "inf" } else { "-inf" }).to_string();
    }
    let precision = FLOAT_DIGITS - 1;
    let scientific = format!("{value:.precision$e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..FLOAT_DIGITS as i32).contains(&exponent) {
        let decimals = (FLOAT_DIGITS as i32 - 1 - exponent) as usize;
        let fixed = format!("{value:.decimals$}");
        let trimmed = trim_fraction(&fixed);
        if trimmed.contains('.') {
            trimmed.to_string()
        } else {
            format!("{trimmed}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

fn quote_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('\'');
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\x{byte:02x}");
            }
        }
    }
    out.push('\'');
    out
}

fn quote_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(ch));
            }
            ch => out.push(ch),
        }
    }
    out.push('\'');
    out
}
