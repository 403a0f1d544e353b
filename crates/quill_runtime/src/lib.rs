#![deny(clippy::unwrap_used)]
//! Runtime support for natively compiled templates: value handles, lookup,
//! output buffering and text coercion.

mod buffer;
mod call;
mod coerce;
mod compare;
mod concat;
mod config;
mod error;
mod guard;
mod index;
mod methods;
mod namespace;
mod path;
mod render;
mod sequence;
mod text;
mod truth;
mod value;

pub use buffer::FragmentBuffer;
pub use call::call;
pub use coerce::{coerce_fragments, Coerced, OutputFilter, PlainCoercion, TextKind};
pub use compare::{compare, values_equal, values_identical, CompareOp};
pub use concat::concatenate;
pub use config::{
    read_config, BufferConfig, CoercionConfig, ConfigError, Decoding, RuntimeConfig,
    ENV_NARROW_DECODING, ENV_TRACE_RENDER,
};
pub use error::{LookupFailure, RuntimeError};
pub use guard::ScopedGuard;
pub use index::get_index;
pub use namespace::Namespace;
pub use path::{resolve_path, Path};
pub use render::{Renderer, Template};
pub use sequence::{iterate, unpack};
pub use text::{format_value, narrow_form, repr, wide_form};
pub use truth::{canonical_bool, coerce_bool, not_value};
pub use value::{NativeFn, NativeFunction, Object, Value};

pub type R = Result<Value, RuntimeError>;

/// Coerce and join `buffer` in one step.
pub fn join_fragments(
    mut buffer: FragmentBuffer,
    filter: &dyn OutputFilter,
    decoding: Decoding,
) -> R {
    let coerced = coerce_fragments(&mut buffer, filter, decoding)?;
    concatenate(&buffer, coerced)
}
