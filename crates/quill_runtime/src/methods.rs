//! Built-in members of maps and text values.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{RuntimeError, Value};

pub(crate) fn bound_method(receiver: &Value, name: &str) -> Option<Value> {
    match receiver {
        Value::Map(map) => map_method(map, name),
        Value::Text(_) | Value::Bytes(_) => text_method(receiver, name),
        _ => None,
    }
}

fn map_method(map: &Rc<IndexMap<String, Value>>, name: &str) -> Option<Value> {
    let map = Rc::clone(map);
    let method = match name {
        "keys" => Value::function("keys", move |args, kwargs| {
            check_args("keys", args, kwargs, 0, 0)?;
            Ok(Value::list(map.keys().map(Value::bytes).collect()))
        }),
        "values" => Value::function("values", move |args, kwargs| {
            check_args("values", args, kwargs, 0, 0)?;
            Ok(Value::list(map.values().cloned().collect()))
        }),
        "items" => Value::function("items", move |args, kwargs| {
            check_args("items", args, kwargs, 0, 0)?;
            Ok(Value::list(
                map.iter()
                    .map(|(key, value)| Value::tuple(vec![Value::bytes(key), value.clone()]))
                    .collect(),
            ))
        }),
        "get" => Value::function("get", move |args, kwargs| {
            check_args("get", args, kwargs, 1, 2)?;
            let key = args[0]
                .as_key()
                .ok_or_else(|| RuntimeError::mismatch("text key", &args[0], "get()"))?;
            Ok(map
                .get(key)
                .cloned()
                .unwrap_or_else(|| args.get(1).cloned().unwrap_or_default()))
        }),
        _ => return None,
    };
    Some(method)
}

fn text_method(receiver: &Value, name: &str) -> Option<Value> {
    let receiver = receiver.clone();
    let transform: fn(&Value) -> Value = match name {
        "upper" => |value| match value {
            Value::Text(text) => Value::text(text.to_uppercase()),
            Value::Bytes(bytes) => Value::bytes(bytes.to_ascii_uppercase()),
            other => other.clone(),
        },
        "lower" => |value| match value {
            Value::Text(text) => Value::text(text.to_lowercase()),
            Value::Bytes(bytes) => Value::bytes(bytes.to_ascii_lowercase()),
            other => other.clone(),
        },
        "strip" => |value| match value {
            Value::Text(text) => Value::text(text.trim()),
            Value::Bytes(bytes) => Value::bytes(bytes.trim_ascii()),
            other => other.clone(),
        },
        _ => return None,
    };
    let method = name.to_string();
    Some(Value::function(name, move |args, kwargs| {
        check_args(&method, args, kwargs, 0, 0)?;
        Ok(transform(&receiver))
    }))
}

fn check_args(
    method: &str,
    args: &[Value],
    kwargs: &[(String, Value)],
    min: usize,
    max: usize,
) -> Result<(), RuntimeError> {
    if let Some((name, _)) = kwargs.first() {
        return Err(RuntimeError::TypeMismatch {
            expected: "positional arguments".to_string(),
            found: format!("keyword argument `{name}`"),
            context: format!("{method}()"),
        });
    }
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{min} arguments")
        } else {
            format!("{min} to {max} arguments")
        };
        return Err(RuntimeError::TypeMismatch {
            expected,
            found: format!("{} arguments", args.len()),
            context: format!("{method}()"),
        });
    }
    Ok(())
}
