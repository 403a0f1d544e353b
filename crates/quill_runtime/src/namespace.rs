use std::rc::Rc;

use indexmap::IndexMap;

use crate::path::resolve_path;
use crate::{LookupFailure, Path, RuntimeError, Value};

/// The display namespace a template is rendered against.
///
/// Usually a map of names; any keyed object works as a root too.
#[derive(Debug, Clone)]
pub struct Namespace {
    root: Value,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    pub fn new() -> Self {
        Self {
            root: Value::Map(Rc::new(IndexMap::new())),
        }
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Bind `name`. Only map roots accept new bindings.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Result<(), RuntimeError> {
        match &mut self.root {
            Value::Map(map) => {
                Rc::make_mut(map).insert(name.into(), value);
                Ok(())
            }
            other => Err(RuntimeError::mismatch("map", other, "namespace binding")),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Result<Self, RuntimeError> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Look up a top-level name.
    pub fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        self.root
            .get_key(name)
            .map(|found| found.into_owned())
            .ok_or_else(|| {
                LookupFailure::MissingName {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Resolve a dotted path whose first segment is a top-level name.
    pub fn resolve(&self, path: &Path) -> Result<Value, RuntimeError> {
        match path.segments().split_first() {
            None => Ok(self.root.clone()),
            Some((first, rest)) => {
                let head = self.lookup(first)?;
                resolve_path(&head, rest)
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::from_value(Value::map(iter))
    }
}

impl From<IndexMap<String, Value>> for Namespace {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::from_value(Value::Map(Rc::new(map)))
    }
}
