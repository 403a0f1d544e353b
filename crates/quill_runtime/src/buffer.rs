use crate::Value;

/// An ordered sequence of rendered fragments.
///
/// Templates append values as they render; the buffer is coerced to a single
/// text kind and joined once rendering finishes.
#[derive(Debug, Clone, Default)]
pub struct FragmentBuffer {
    fragments: Vec<Value>,
}

impl FragmentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fragments: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, fragment: Value) {
        self.fragments.push(fragment);
    }

    /// Append a narrow literal.
    pub fn push_bytes(&mut self, literal: &[u8]) {
        self.fragments.push(Value::bytes(literal));
    }

    /// Append a wide literal.
    pub fn push_text(&mut self, literal: &str) {
        self.fragments.push(Value::text(literal));
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.fragments.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.fragments
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    pub fn into_fragments(self) -> Vec<Value> {
        self.fragments
    }

    pub(crate) fn fragments_mut(&mut self) -> &mut [Value] {
        &mut self.fragments
    }
}

impl Extend<Value> for FragmentBuffer {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        self.fragments.extend(iter);
    }
}

impl FromIterator<Value> for FragmentBuffer {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            fragments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FragmentBuffer {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}
