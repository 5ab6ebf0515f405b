//! Structured-text codecs used by file datasets.

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use datacat_core::error::Error;

use crate::options::{FlowStyle, SaveOptions};

/// Characters that end a plain scalar inside a flow collection.
const FLOW_INDICATORS: &[char] = &[',', '[', ']', '{', '}', ':', '#'];

/// Error types for codec operations.
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Converts into a dataset error, attributing it to `path`.
    pub fn into_error(self, path: &Path) -> Error {
        match self {
            CodecError::Parse(message) => Error::Parse {
                path: path.to_path_buf(),
                message,
            },
            CodecError::Serialize(message) => Error::Serialization(message),
            CodecError::Io(e) => Error::Io(e),
        }
    }
}

impl From<serde_yaml::Error> for CodecError {
    fn from(error: serde_yaml::Error) -> Self {
        CodecError::Serialize(error.to_string())
    }
}

/// Parser/serializer pair for a structured-text format.
pub trait Codec: Send + Sync {
    /// Parses the full contents of `reader`.
    fn parse(&self, reader: &mut dyn Read) -> Result<Value, CodecError>;

    /// Renders `payload` as text according to `options`.
    fn serialize(&self, payload: &Value, options: &SaveOptions) -> Result<String, CodecError>;
}

/// YAML codec restricted to plain scalars, sequences and mappings.
///
/// Parsing rejects any explicitly tagged node (`!!python/object`, `!Custom`
/// and the like) so untrusted files can never ask for a specific type.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeYamlCodec;

impl Codec for SafeYamlCodec {
    fn parse(&self, reader: &mut dyn Read) -> Result<Value, CodecError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| CodecError::Parse(format!("invalid UTF-8: {}", e)))?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value =
            serde_yaml::from_str(&text).map_err(|e| CodecError::Parse(e.to_string()))?;
        reject_tags(&value)?;
        Ok(value)
    }

    fn serialize(&self, payload: &Value, options: &SaveOptions) -> Result<String, CodecError> {
        let payload = if options.sort_keys {
            let mut sorted = payload.clone();
            sort_keys(&mut sorted);
            Cow::Owned(sorted)
        } else {
            Cow::Borrowed(payload)
        };

        let body = match options.flow_style {
            FlowStyle::Block => serde_yaml::to_string(&*payload)?,
            FlowStyle::Flow => {
                let mut out = String::new();
                write_flow(&payload, &mut out)?;
                out.push('\n');
                out
            }
        };

        let mut text = String::with_capacity(body.len() + 8);
        if options.explicit_start {
            text.push_str("---\n");
        }
        text.push_str(&body);
        if options.explicit_end {
            text.push_str("...\n");
        }
        Ok(text)
    }
}

fn reject_tags(value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Tagged(tagged) => Err(CodecError::Parse(format!(
            "tag {} is not allowed in safe mode",
            tagged.tag
        ))),
        Value::Sequence(items) => items.iter().try_for_each(reject_tags),
        Value::Mapping(map) => map.iter().try_for_each(|(key, value)| {
            reject_tags(key)?;
            reject_tags(value)
        }),
        _ => Ok(()),
    }
}

fn sort_keys(value: &mut Value) {
    match value {
        Value::Mapping(map) => {
            let mut entries: Vec<(Value, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by_cached_key(|(key, _)| match key {
                Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other).unwrap_or_default(),
            });
            let mut sorted = Mapping::with_capacity(entries.len());
            for (key, mut value) in entries {
                sort_keys(&mut value);
                sorted.insert(key, value);
            }
            *map = sorted;
        }
        Value::Sequence(items) => items.iter_mut().for_each(sort_keys),
        Value::Tagged(tagged) => sort_keys(&mut tagged.value),
        _ => {}
    }
}

fn write_flow(value: &Value, out: &mut String) -> Result<(), CodecError> {
    match value {
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_flow(item, out)?;
            }
            out.push(']');
        }
        Value::Mapping(map) => {
            out.push('{');
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_flow(key, out)?;
                out.push_str(": ");
                write_flow(value, out)?;
            }
            out.push('}');
        }
        Value::Tagged(tagged) => {
            out.push_str(&tagged.tag.to_string());
            out.push(' ');
            write_flow(&tagged.value, out)?;
        }
        Value::String(s) => out.push_str(&flow_string(s)?),
        scalar => out.push_str(serde_yaml::to_string(scalar)?.trim_end()),
    }
    Ok(())
}

/// Renders a string for use inside a flow collection.
///
/// Falls back to an escaped double-quoted scalar when the block rendering
/// spans lines, holds a character needing an escape, or would be cut short
/// by a flow indicator.
fn flow_string(s: &str) -> Result<String, CodecError> {
    if s.chars().any(needs_escape) {
        return Ok(double_quoted(s));
    }

    let rendered = serde_yaml::to_string(s)?;
    let rendered = rendered.trim_end_matches('\n');

    let quoted = rendered.starts_with('\'') || rendered.starts_with('"');
    let multiline =
        rendered.contains('\n') || rendered.starts_with('|') || rendered.starts_with('>');

    if multiline || (!quoted && rendered.contains(FLOW_INDICATORS)) {
        Ok(double_quoted(s))
    } else {
        Ok(rendered.to_string())
    }
}

/// Control characters, YAML line breaks and non-printables.
fn needs_escape(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}'
        )
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if needs_escape(c) => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{:02X}", code));
                } else {
                    out.push_str(&format!("\\u{:04X}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
