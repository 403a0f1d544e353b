use std::time::Instant;

use tracing::{debug, info};

use crate::coerce::{coerce_fragments, OutputFilter, PlainCoercion};
use crate::concat::concatenate;
use crate::{FragmentBuffer, Namespace, RuntimeConfig, RuntimeError, Value};

/// A compiled template: appends its output fragments to `out`.
pub trait Template {
    fn render(&self, ns: &Namespace, out: &mut FragmentBuffer) -> Result<(), RuntimeError>;
}

impl<F> Template for F
where
    F: Fn(&Namespace, &mut FragmentBuffer) -> Result<(), RuntimeError>,
{
    fn render(&self, ns: &Namespace, out: &mut FragmentBuffer) -> Result<(), RuntimeError> {
        self(ns, out)
    }
}

/// Runs templates and turns their fragments into a single text value.
#[derive(Debug, Clone)]
pub struct Renderer<F = PlainCoercion> {
    config: RuntimeConfig,
    filter: F,
}

impl Default for Renderer<PlainCoercion> {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl Renderer<PlainCoercion> {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            filter: PlainCoercion,
        }
    }
}

impl<F: OutputFilter> Renderer<F> {
    pub fn with_filter<G: OutputFilter>(self, filter: G) -> Renderer<G> {
        Renderer {
            config: self.config,
            filter,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Render `template` and join its output. The result is narrow text
    /// unless some fragment required wide text.
    pub fn render_to_value<T>(&self, template: &T, ns: &Namespace) -> Result<Value, RuntimeError>
    where
        T: Template + ?Sized,
    {
        let started = self.config.trace_render.then(Instant::now);
        let mut out = FragmentBuffer::with_capacity(self.config.buffer.initial_capacity);
        debug!("render start");
        template.render(ns, &mut out)?;
        let coerced = coerce_fragments(
            &mut out,
            &self.filter,
            self.config.coercion.narrow_decoding,
        )?;
        let rendered = concatenate(&out, coerced)?;
        debug!(
            fragments = out.len(),
            kind = ?coerced.kind,
            len = coerced.total_len,
            "render finished"
        );
        if let Some(started) = started {
            info!(
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                fragments = out.len(),
                "render timing"
            );
        }
        Ok(rendered)
    }

    /// Render to a Rust string, decoding narrow output with the configured
    /// decoding.
    pub fn render_to_string<T>(&self, template: &T, ns: &Namespace) -> Result<String, RuntimeError>
    where
        T: Template + ?Sized,
    {
        match self.render_to_value(template, ns)? {
            Value::Text(text) => Ok(text.to_string()),
            Value::Bytes(bytes) => self.config.coercion.narrow_decoding.decode(&bytes),
            other => Err(RuntimeError::InternalInvariant(format!(
                "render produced {}",
                other.type_name()
            ))),
        }
    }
}
