use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::RuntimeError;

pub const ENV_NARROW_DECODING: &str = "QUILL_NARROW_DECODING";
pub const ENV_TRACE_RENDER: &str = "QUILL_TRACE_RENDER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },
    #[error("invalid value {value:?} for {var}")]
    Env { var: String, value: String },
}

/// How narrow text is decoded when it has to join wide output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Decoding {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "ascii")]
    Ascii,
    #[serde(rename = "latin-1", alias = "latin1")]
    Latin1,
}

impl Decoding {
    pub fn name(self) -> &'static str {
        match self {
            Decoding::Utf8 => "utf-8",
            Decoding::Ascii => "ascii",
            Decoding::Latin1 => "latin-1",
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<String, RuntimeError> {
        match self {
            Decoding::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|err| self.failure(err.to_string())),
            Decoding::Ascii => match bytes.iter().position(|byte| !byte.is_ascii()) {
                Some(position) => Err(self.failure(format!(
                    "byte 0x{:02x} at position {position} is not ascii",
                    bytes[position]
                ))),
                None => Ok(bytes.iter().map(|&byte| char::from(byte)).collect()),
            },
            Decoding::Latin1 => Ok(bytes.iter().map(|&byte| char::from(byte)).collect()),
        }
    }

    fn failure(self, detail: String) -> RuntimeError {
        RuntimeError::TypeCoercion {
            type_name: "bytes".to_string(),
            detail: format!("{} decoding failed: {detail}", self.name()),
        }
    }
}

impl FromStr for Decoding {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Decoding::Utf8),
            "ascii" => Ok(Decoding::Ascii),
            "latin-1" | "latin1" => Ok(Decoding::Latin1),
            other => Err(format!("unknown decoding `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub coercion: CoercionConfig,
    #[serde(default)]
    pub buffer: BufferConfig,
    /// Log render durations at info level.
    #[serde(default)]
    pub trace_render: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CoercionConfig {
    #[serde(default)]
    pub narrow_decoding: Decoding,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BufferConfig {
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
        }
    }
}

fn default_initial_capacity() -> usize {
    32
}

impl RuntimeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        parse(text, "<inline>")
    }

    /// Overrides from `QUILL_NARROW_DECODING` and `QUILL_TRACE_RENDER`.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_NARROW_DECODING) {
            self.coercion.narrow_decoding = value.parse().map_err(|_| ConfigError::Env {
                var: ENV_NARROW_DECODING.to_string(),
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_TRACE_RENDER) {
            self.trace_render = matches!(value.trim(), "1" | "true" | "yes");
        }
        Ok(self)
    }
}

pub fn read_config(path: &Path) -> Result<RuntimeConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse(&text, &path.display().to_string())
}

fn parse(text: &str, origin: &str) -> Result<RuntimeConfig, ConfigError> {
    toml::from_str(text).map_err(|err| ConfigError::Parse {
        origin: origin.to_string(),
        message: err.to_string(),
    })
}
