//! Token reference resolution
//!
//! String values may refer to other tokens with `{path.to.token}`, either as
//! the whole value or embedded in a larger value:
//!
//! - `{color.base.red}` - whole-value reference, takes the target's value as is
//! - `1px solid {color.border}` - embedded reference, interpolated as text
//!
//! References resolve recursively with circular dependency detection. In
//! output-reference mode they are rewritten to `var(--name)` instead.

use crate::dictionary::Dictionary;
use crate::token::{Token, TokenPath};
use serde_json::Value;
use thiserror::Error;

/// Maximum depth for reference resolution to prevent stack overflow
const MAX_RESOLUTION_DEPTH: usize = 100;

/// Error type for reference resolution failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// Referenced token does not exist
    #[error("undefined reference '{{{0}}}'")]
    Undefined(String),
    /// Circular dependency detected in reference resolution
    #[error("circular reference: {}", .0.join(" -> "))]
    Circular(Vec<String>),
    /// Composite value used inside a larger string
    #[error("reference '{{{0}}}' points to a composite value and cannot be interpolated")]
    NotInterpolable(String),
    /// Maximum recursion depth exceeded
    #[error("maximum reference resolution depth exceeded")]
    MaxDepthExceeded,
}

/// Which value of a referenced token to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// The token's value
    Light,
    /// The token's `dark` override, falling back to its value
    Dark,
}

/// Check whether a string contains a `{...}` reference.
pub fn contains_reference(s: &str) -> bool {
    find_reference(s, 0).is_some()
}

/// Find the first reference at or after `from`.
///
/// Returns (start, end, path) where `start..end` covers the braces.
fn find_reference(s: &str, from: usize) -> Option<(usize, usize, &str)> {
    let mut search = from;
    loop {
        let open = search + s[search..].find('{')?;
        let rest = &s[open + 1..];
        let close = rest.find('}')?;
        let inner = &rest[..close];
        // `{` inside means this brace was not a reference opener
        if let Some(nested) = inner.rfind('{') {
            search = open + 1 + nested;
            continue;
        }
        let trimmed = inner.trim();
        if trimmed.is_empty() {
            search = open + 1;
            continue;
        }
        return Some((open, open + 1 + close + 1, trimmed));
    }
}

/// Render a scalar or list value as CSS text.
///
/// Returns `None` for objects, which have no text form.
pub fn css_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(items) => {
            let parts: Option<Vec<String>> = items.iter().map(css_text).collect();
            parts.map(|p| p.join(", "))
        }
        Value::Object(_) => None,
    }
}

/// Resolves references against a dictionary.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    dictionary: &'a Dictionary,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    /// Resolve all references in `value`.
    pub fn resolve(&self, value: &Value, mode: ColorMode) -> Result<Value, ReferenceError> {
        let mut stack = Vec::new();
        self.resolve_internal(value, mode, &mut stack, 0)
    }

    /// Resolve a token's value (`Light`) or dark override (`Dark`).
    ///
    /// In dark mode a token without an override resolves its value, but still
    /// follows references to the dark side of other tokens.
    pub fn resolve_token(&self, token: &Token, mode: ColorMode) -> Result<Value, ReferenceError> {
        let raw = match mode {
            ColorMode::Light => &token.value,
            ColorMode::Dark => token.dark.as_ref().unwrap_or(&token.value),
        };
        let mut stack = vec![token.path.to_string()];
        self.resolve_internal(raw, mode, &mut stack, 0)
    }

    /// Rewrite every reference in `value` to `var(--name)`.
    pub fn output_references(&self, value: &Value) -> Result<Value, ReferenceError> {
        match value {
            Value::String(s) => {
                let mut result = String::with_capacity(s.len());
                let mut cursor = 0;
                while let Some((start, end, path)) = find_reference(s, cursor) {
                    let token = self.lookup(path)?;
                    result.push_str(&s[cursor..start]);
                    result.push_str(&format!("var(--{})", token.name));
                    cursor = end;
                }
                result.push_str(&s[cursor..]);
                Ok(Value::String(result))
            }
            Value::Array(items) => items
                .iter()
                .map(|v| self.output_references(v))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut out = serde_json::Map::new();
                for (k, v) in map {
                    out.insert(k.clone(), self.output_references(v)?);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other.clone()),
        }
    }

    fn lookup(&self, path: &str) -> Result<&'a Token, ReferenceError> {
        self.dictionary
            .get_by_path(&TokenPath::parse(path))
            .ok_or_else(|| ReferenceError::Undefined(path.to_string()))
    }

    fn resolve_internal(
        &self,
        value: &Value,
        mode: ColorMode,
        stack: &mut Vec<String>,
        depth: usize,
    ) -> Result<Value, ReferenceError> {
        if depth > MAX_RESOLUTION_DEPTH {
            return Err(ReferenceError::MaxDepthExceeded);
        }

        match value {
            Value::String(s) => self.resolve_string(s, mode, stack, depth),
            Value::Array(items) => items
                .iter()
                .map(|v| self.resolve_internal(v, mode, stack, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut out = serde_json::Map::new();
                for (k, v) in map {
                    out.insert(k.clone(), self.resolve_internal(v, mode, stack, depth + 1)?);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other.clone()),
        }
    }

    fn resolve_string(
        &self,
        s: &str,
        mode: ColorMode,
        stack: &mut Vec<String>,
        depth: usize,
    ) -> Result<Value, ReferenceError> {
        let Some((start, end, path)) = find_reference(s, 0) else {
            return Ok(Value::String(s.to_string()));
        };

        // Whole-value reference keeps the target's type (number, list, ...)
        if start == 0 && end == s.len() {
            return self.resolve_path(path, mode, stack, depth);
        }

        let mut result = String::with_capacity(s.len());
        let mut cursor = 0;
        let mut next = Some((start, end, path));
        while let Some((start, end, path)) = next {
            let resolved = self.resolve_path(path, mode, stack, depth)?;
            let text =
                css_text(&resolved).ok_or_else(|| ReferenceError::NotInterpolable(path.to_string()))?;
            result.push_str(&s[cursor..start]);
            result.push_str(&text);
            cursor = end;
            next = find_reference(s, cursor);
        }
        result.push_str(&s[cursor..]);
        Ok(Value::String(result))
    }

    fn resolve_path(
        &self,
        path: &str,
        mode: ColorMode,
        stack: &mut Vec<String>,
        depth: usize,
    ) -> Result<Value, ReferenceError> {
        let normalized = TokenPath::parse(path).to_string();

        if stack.contains(&normalized) {
            let mut chain = stack.clone();
            chain.push(normalized);
            return Err(ReferenceError::Circular(chain));
        }

        let token = self.lookup(path)?;
        let raw = match mode {
            ColorMode::Light => &token.value,
            ColorMode::Dark => token.dark.as_ref().unwrap_or(&token.value),
        };

        stack.push(normalized);
        let resolved = self.resolve_internal(raw, mode, stack, depth + 1);
        stack.pop();
        resolved
    }
}
