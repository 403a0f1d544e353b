use tracing::trace;

use crate::Value;

/// Owns at most one value handle and releases it when the scope ends.
///
/// Generated code stores temporaries here so that every exit path, including
/// early returns on error, drops exactly the handles it acquired.
#[derive(Debug, Default)]
pub struct ScopedGuard {
    held: Option<Value>,
}

impl ScopedGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holding(value: Value) -> Self {
        Self { held: Some(value) }
    }

    /// Store `value`, releasing whatever was held before.
    pub fn set(&mut self, value: Value) {
        self.release();
        self.held = Some(value);
    }

    pub fn get(&self) -> Option<&Value> {
        self.held.as_ref()
    }

    /// Give up ownership without releasing.
    pub fn take(&mut self) -> Option<Value> {
        self.held.take()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_none()
    }

    fn release(&mut self) {
        if let Some(value) = self.held.take() {
            trace!(type_name = value.type_name(), "releasing guarded value");
        }
    }
}

impl Drop for ScopedGuard {
    fn drop(&mut self) {
        self.release();
    }
}
