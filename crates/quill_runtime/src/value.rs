use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::methods::bound_method;
use crate::{values_equal, Decoding, LookupFailure, RuntimeError};

pub type NativeFn = dyn Fn(&[Value], &[(String, Value)]) -> Result<Value, RuntimeError>;

/// A dynamically typed value handle.
///
/// Cloning a handle shares the underlying data; the value is dropped when the
/// last handle goes away. `Bytes` is narrow text and `Text` is wide text.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Bytes(Rc<[u8]>),
    Text(Rc<str>),
    List(Rc<Vec<Value>>),
    Tuple(Rc<Vec<Value>>),
    Map(Rc<IndexMap<String, Value>>),
    Function(Rc<NativeFunction>),
    Object(Rc<dyn Object>),
}

/// Host-defined values that expose members, keys, items and text forms.
///
/// Every hook has a default so implementors only override what they support.
pub trait Object: fmt::Debug {
    fn type_name(&self) -> &str;

    fn get_attr(&self, name: &str) -> Result<Value, RuntimeError> {
        Err(LookupFailure::MissingAttribute {
            type_name: self.type_name().to_string(),
            name: name.to_string(),
        }
        .into())
    }

    /// Keyed lookup. `None` means the object is not keyed or has no such key.
    fn get_key(&self, _name: &str) -> Option<Value> {
        None
    }

    fn get_item(&self, _index: &Value) -> Result<Value, RuntimeError> {
        Err(RuntimeError::TypeMismatch {
            expected: "subscriptable value".to_string(),
            found: self.type_name().to_string(),
            context: "indexed access".to_string(),
        })
    }

    fn to_narrow(&self) -> Result<Vec<u8>, RuntimeError> {
        Ok(format!("<{} object>", self.type_name()).into_bytes())
    }

    /// Wide text form. Defaults to decoding the narrow form.
    fn to_wide(&self, decoding: Decoding) -> Result<String, RuntimeError> {
        decoding.decode(&self.to_narrow()?)
    }

    fn truthy(&self) -> Result<bool, RuntimeError> {
        Ok(true)
    }

    fn call(&self, _args: &[Value], _kwargs: &[(String, Value)]) -> Result<Value, RuntimeError> {
        Err(RuntimeError::TypeMismatch {
            expected: "callable".to_string(),
            found: self.type_name().to_string(),
            context: "call".to_string(),
        })
    }

    /// The items produced by iterating the object, or `None` when it is not iterable.
    fn iterate(&self) -> Option<Result<Vec<Value>, RuntimeError>> {
        None
    }

    /// Membership test for `in`. Defaults to searching the iterated items;
    /// `None` means the object is not a container.
    fn contains(&self, item: &Value) -> Option<Result<bool, RuntimeError>> {
        self.iterate().map(|items| {
            items.map(|items| items.iter().any(|candidate| values_equal(candidate, item)))
        })
    }
}

pub struct NativeFunction {
    name: String,
    func: Box<NativeFn>,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&[Value], &[(String, Value)]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(
        &self,
        args: &[Value],
        kwargs: &[(String, Value)],
    ) -> Result<Value, RuntimeError> {
        (self.func)(args, kwargs)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(value) => write!(f, "Bool({value})"),
            Value::Int(value) => write!(f, "Int({value})"),
            Value::Float(value) => write!(f, "Float({value})"),
            Value::Bytes(bytes) => write!(f, "Bytes({:?})", String::from_utf8_lossy(bytes)),
            Value::Text(text) => write!(f, "Text({text:?})"),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Tuple(items) => f.debug_tuple("Tuple").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Function(function) => write!(f, "Function({})", function.name()),
            Value::Object(object) => write!(f, "Object({object:?})"),
        }
    }
}

impl Value {
    pub fn bytes(bytes: impl AsRef<[u8]>) -> Self {
        Value::Bytes(Rc::from(bytes.as_ref()))
    }

    pub fn text(text: impl AsRef<str>) -> Self {
        Value::Text(Rc::from(text.as_ref()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Rc::new(items))
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Rc::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        ))
    }

    pub fn function(
        name: impl Into<String>,
        func: impl Fn(&[Value], &[(String, Value)]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Value::Function(Rc::new(NativeFunction::new(name, func)))
    }

    pub fn object(object: impl Object + 'static) -> Self {
        Value::Object(Rc::new(object))
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Object(object) => object.type_name(),
        }
    }

    pub fn is_truthy(&self) -> Result<bool, RuntimeError> {
        Ok(match self {
            Value::None => false,
            Value::Bool(value) => *value,
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::Bytes(bytes) => !bytes.is_empty(),
            Value::Text(text) => !text.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Function(_) => true,
            Value::Object(object) => return object.truthy(),
        })
    }

    /// Keyed lookup without raising. Maps lend their entry; objects hand back
    /// an owned value.
    pub fn get_key(&self, name: &str) -> Option<Cow<'_, Value>> {
        match self {
            Value::Map(map) => map.get(name).map(Cow::Borrowed),
            Value::Object(object) => object.get_key(name).map(Cow::Owned),
            _ => None,
        }
    }

    /// Named-member lookup: object members, or the built-in methods of maps
    /// and text.
    pub fn get_attr(&self, name: &str) -> Result<Value, RuntimeError> {
        if let Value::Object(object) = self {
            return object.get_attr(name);
        }
        bound_method(self, name).ok_or_else(|| {
            LookupFailure::MissingAttribute {
                type_name: self.type_name().to_string(),
                name: name.to_string(),
            }
            .into()
        })
    }

    /// The textual content of a text value, used for map keys.
    pub(crate) fn as_key(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::text(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Rc::from(value))
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(Rc::from(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Opaque;

    impl Object for Opaque {
        fn type_name(&self) -> &str {
            "opaque"
        }
    }

    #[test]
    fn truthiness_of_builtins() {
        assert!(!Value::None.is_truthy().unwrap());
        assert!(!Value::Int(0).is_truthy().unwrap());
        assert!(Value::Int(-3).is_truthy().unwrap());
        assert!(!Value::bytes("").is_truthy().unwrap());
        assert!(Value::text("x").is_truthy().unwrap());
        assert!(!Value::list(vec![]).is_truthy().unwrap());
        assert!(Value::object(Opaque).is_truthy().unwrap());
    }

    #[test]
    fn map_key_lookup_borrows() {
        let map = Value::map([("a", Value::Int(1))]);
        assert!(matches!(map.get_key("a"), Some(Cow::Borrowed(Value::Int(1)))));
        assert!(map.get_key("b").is_none());
        assert!(Value::Int(1).get_key("a").is_none());
    }

    #[test]
    fn missing_member_names_type() {
        let err = Value::object(Opaque).get_attr("size").unwrap_err();
        assert_eq!(
            err,
            RuntimeError::Lookup(LookupFailure::MissingAttribute {
                type_name: "opaque".into(),
                name: "size".into(),
            })
        );
        assert!(matches!(
            Value::Int(3).get_attr("real"),
            Err(RuntimeError::Lookup(LookupFailure::MissingAttribute { .. }))
        ));
    }

    #[test]
    fn debug_output_is_readable() {
        let value = Value::list(vec![Value::bytes("a"), Value::text("b"), Value::Int(2)]);
        assert_eq!(
            format!("{value:?}"),
            r#"List([Bytes("a"), Text("b"), Int(2)])"#
        );
    }
}
