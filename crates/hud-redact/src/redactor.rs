//! Detection policy and the two redaction entry points.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::patterns::{Anchor, SECRET_SHAPES, SENSITIVE_KEYS};

/// Replacement emitted for anything detected as sensitive.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// String values shorter than this never count as secrets.
pub const MIN_SECRET_LEN: usize = 16;

/// Default recursion ceiling for structural redaction.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid pattern '{label}': {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern '{label}' matches the redaction marker")]
    MatchesMarker { label: String },
}

/// A shape compiled for both match modes: anchored for whole string
/// values, word-boundary-guarded for free text.
#[derive(Debug, Clone)]
struct CompiledShape {
    label: String,
    value: Regex,
    text: Regex,
}

/// Table-driven detection policy: which key names and which value
/// shapes count as sensitive.
///
/// The policy is plain data. It is handed to a [`Redactor`] rather than
/// read from a global, so callers can extend it without touching
/// traversal code.
#[derive(Debug, Clone)]
pub struct DetectionPolicy {
    keys: HashSet<String>,
    shapes: Vec<CompiledShape>,
}

impl DetectionPolicy {
    /// Policy over the built-in tables.
    pub fn builtin() -> Self {
        let keys = SENSITIVE_KEYS.iter().map(|key| (*key).to_string()).collect();
        let shapes = SECRET_SHAPES
            .iter()
            .map(|shape| {
                compile_shape(shape.label, shape.pattern, shape.anchor)
                    .expect("built-in shape must compile")
            })
            .collect();
        Self { keys, shapes }
    }

    /// Add a sensitive key name. The name is normalized the same way
    /// lookups are, so `"Api-Key"` and `"apikey"` are equivalent.
    pub fn with_sensitive_key(mut self, key: &str) -> Self {
        self.keys.insert(normalize_key(key));
        self
    }

    /// Add a custom secret shape. Fails if the pattern does not compile
    /// or if it would re-match already-redacted output.
    pub fn with_shape(
        mut self,
        label: &str,
        pattern: &str,
        anchor: Anchor,
    ) -> Result<Self, PolicyError> {
        let compiled = compile_shape(label, pattern, anchor)?;
        if compiled.value.is_match(REDACTION_MARKER) || compiled.text.is_match(REDACTION_MARKER) {
            return Err(PolicyError::MatchesMarker {
                label: compiled.label,
            });
        }
        self.shapes.push(compiled);
        Ok(self)
    }

    /// True when `key` names a credential slot. Matching is insensitive
    /// to case and to the `.`, `-`, `_` separators.
    pub fn is_sensitive_key(&self, key: &str) -> bool {
        self.keys.contains(&normalize_key(key))
    }

    /// True when the whole string value looks like a credential. Short
    /// strings never qualify, whatever their content.
    pub fn looks_like_secret(&self, value: &str) -> bool {
        if value.len() < MIN_SECRET_LEN {
            return false;
        }
        self.shapes.iter().any(|shape| shape.value.is_match(value))
    }
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '.' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn compile_shape(label: &str, pattern: &str, anchor: Anchor) -> Result<CompiledShape, PolicyError> {
    let (value_src, text_src) = match anchor {
        Anchor::Value => (
            format!("^(?:{})$", pattern),
            format!(r"\b(?:{})\b", pattern),
        ),
        Anchor::Prefix => (format!("^(?:{})", pattern), format!(r"\b(?:{})", pattern)),
    };
    let compile = |src: &str| {
        Regex::new(src).map_err(|e| PolicyError::InvalidPattern {
            label: label.to_string(),
            source: e,
        })
    };
    Ok(CompiledShape {
        label: label.to_string(),
        value: compile(&value_src)?,
        text: compile(&text_src)?,
    })
}

/// Deep redactor over JSON trees and free text.
///
/// Both entry points are pure: they never modify their input, never
/// fail, and return the marker in place of anything the policy flags.
#[derive(Debug, Clone)]
pub struct Redactor {
    policy: DetectionPolicy,
    max_depth: usize,
}

impl Redactor {
    pub fn new(policy: DetectionPolicy) -> Self {
        Self {
            policy,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the recursion ceiling. A container at the ceiling is
    /// collapsed to the marker rather than passed through unredacted.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Return a redacted copy of `value`.
    ///
    /// Values at sensitive keys are suppressed wholesale, without
    /// recursing into them. Secret-shaped strings become the marker.
    /// Everything else is walked: arrays keep order and length, objects
    /// keep key order.
    pub fn redact(&self, value: &Value) -> Value {
        self.redact_at(value, 0)
    }

    fn redact_at(&self, value: &Value, depth: usize) -> Value {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
            Value::String(s) => {
                if self.policy.looks_like_secret(s) {
                    marker()
                } else {
                    value.clone()
                }
            }
            Value::Array(items) => {
                if depth >= self.max_depth {
                    return marker();
                }
                Value::Array(
                    items
                        .iter()
                        .map(|item| self.redact_at(item, depth + 1))
                        .collect(),
                )
            }
            Value::Object(fields) => {
                if depth >= self.max_depth {
                    return marker();
                }
                let mut out = Map::with_capacity(fields.len());
                for (key, val) in fields {
                    if self.policy.is_sensitive_key(key) {
                        out.insert(key.clone(), marker());
                    } else {
                        out.insert(key.clone(), self.redact_at(val, depth + 1));
                    }
                }
                Value::Object(out)
            }
        }
    }

    /// Scrub free text: each shape applied in table order, every
    /// non-overlapping occurrence replaced with the marker. Marker text
    /// inserted by an earlier shape is never re-matched.
    pub fn redact_text(&self, text: &str) -> String {
        let mut out = text.to_string();
        for shape in &self.policy.shapes {
            if shape.text.is_match(&out) {
                out = shape.text.replace_all(&out, REDACTION_MARKER).into_owned();
            }
        }
        out
    }

    /// Serialize `payload` and redact the resulting tree. The single
    /// choke point for anything leaving the process.
    pub fn sanitize<T: Serialize>(&self, payload: &T) -> serde_json::Result<Value> {
        let value = serde_json::to_value(payload)?;
        Ok(self.redact(&value))
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DetectionPolicy::builtin())
    }
}

fn marker() -> Value {
    Value::String(REDACTION_MARKER.to_string())
}
