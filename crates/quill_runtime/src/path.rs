use std::borrow::Cow;
use std::fmt;

use tracing::trace;

use crate::{RuntimeError, Value};

/// A dotted access path such as `user.address.city`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::default();
        }
        dotted.split('.').collect()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn resolve(&self, base: &Value) -> Result<Value, RuntimeError> {
        resolve_path(base, &self.segments)
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Walk `names` from `base`, returning a new handle to the final value.
///
/// Each step tries keyed lookup first and falls back to named-member lookup.
/// Keyed hits on maps are borrowed; member lookups produce owned values that
/// stay alive until the rest of the walk finishes. An empty path returns
/// `base` itself.
pub fn resolve_path<S: AsRef<str>>(base: &Value, names: &[S]) -> Result<Value, RuntimeError> {
    match names.split_first() {
        None => Ok(base.clone()),
        Some((name, rest)) => step(base, name.as_ref(), rest),
    }
}

fn step<S: AsRef<str>>(current: &Value, name: &str, rest: &[S]) -> Result<Value, RuntimeError> {
    if let Some(found) = current.get_key(name) {
        return match found {
            Cow::Borrowed(next) => resolve_path(next, rest),
            Cow::Owned(next) => continue_owned(next, rest),
        };
    }
    trace!(
        segment = name,
        type_name = current.type_name(),
        "keyed lookup missed, trying member"
    );
    let next = current.get_attr(name)?;
    continue_owned(next, rest)
}

fn continue_owned<S: AsRef<str>>(next: Value, rest: &[S]) -> Result<Value, RuntimeError> {
    if rest.is_empty() {
        Ok(next)
    } else {
        resolve_path(&next, rest)
    }
}
