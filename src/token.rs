//! Token model: paths, definitions, and resolved tokens
//!
//! A token is any object in a token file that carries a `value` (or DTCG
//! `$value`) key. Everything else is a group and is recursed into.
//!
//! # Example
//!
//! ```
//! use tokensmith::token::TokenPath;
//!
//! let path = TokenPath::parse("asset.font.inter.400.normal");
//! assert_eq!(path.len(), 5);
//! assert_eq!(path.to_kebab(None), "asset-font-inter-400-normal");
//! assert!(path.starts_with(&["asset", "font"]));
//! ```

use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Token type marking a font asset.
pub const FONT_TYPE: &str = "font";

/// Hierarchical path of a token (`category.type.item...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TokenPath(Vec<String>);

impl TokenPath {
    /// Create a path from segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parse a dot-separated path (`color.base.red`).
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Segment at `index`, if present.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the path begins with the given segments.
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.0.len() && prefix.iter().zip(&self.0).all(|(a, b)| *a == b)
    }

    /// Return a new path with `segment` appended.
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    /// Kebab-case custom property name (without the leading `--`).
    ///
    /// Words are split on separators and lower-to-upper case boundaries, so
    /// `color.textPrimary` becomes `color-text-primary`.
    pub fn to_kebab(&self, prefix: Option<&str>) -> String {
        let mut words: Vec<String> = Vec::new();
        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            words.extend(kebab_words(prefix));
        }
        for segment in &self.0 {
            words.extend(kebab_words(segment));
        }
        words.join("-")
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Split an identifier into lowercase words for kebab-casing.
fn kebab_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in input.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Check whether a JSON object is a token (has `value` or `$value`).
pub fn is_token_object(obj: &Map<String, Value>) -> bool {
    obj.contains_key("value") || obj.contains_key("$value")
}

/// A token object as written in the merged source tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDefinition {
    /// The declared value (may contain `{path}` references)
    pub value: Value,
    /// Declared type (`color`, `dimension`, `font`, ...)
    pub token_type: Option<String>,
    /// Dark-mode override
    pub dark: Option<Value>,
    /// Font formats for font assets
    pub formats: Option<Vec<String>>,
    /// Comment or description
    pub comment: Option<String>,
    /// Remaining keys, kept verbatim
    pub extra: Map<String, Value>,
}

impl TokenDefinition {
    /// Read a definition out of a token object.
    ///
    /// Returns an error message when a known key has the wrong shape.
    pub fn from_object(obj: &Map<String, Value>) -> Result<Self, String> {
        let mut extra = Map::new();
        let mut value = None;
        let mut token_type = None;
        let mut dark = None;
        let mut formats = None;
        let mut comment = None;

        for (key, v) in obj {
            match key.as_str() {
                "value" | "$value" => value = Some(v.clone()),
                "type" | "$type" => {
                    token_type = Some(
                        v.as_str().ok_or_else(|| format!("'{}' must be a string", key))?.to_string(),
                    );
                }
                "dark" => {
                    // `dark` may be a bare value or a nested token object
                    dark = Some(match v {
                        Value::Object(inner) if is_token_object(inner) => inner
                            .get("value")
                            .or_else(|| inner.get("$value"))
                            .cloned()
                            .unwrap_or(Value::Null),
                        other => other.clone(),
                    });
                }
                "formats" => {
                    let list = v
                        .as_array()
                        .ok_or_else(|| "'formats' must be an array of strings".to_string())?;
                    let mut out = Vec::with_capacity(list.len());
                    for item in list {
                        let s = item
                            .as_str()
                            .ok_or_else(|| "'formats' must be an array of strings".to_string())?;
                        out.push(s.to_string());
                    }
                    formats = Some(out);
                }
                "comment" | "description" | "$description" => {
                    comment = v.as_str().map(str::to_string);
                }
                _ => {
                    extra.insert(key.clone(), v.clone());
                }
            }
        }

        let value = value.ok_or_else(|| "token has no value".to_string())?;
        if value.is_null() {
            return Err("token value is null".to_string());
        }

        Ok(Self { value, token_type, dark, formats, comment, extra })
    }
}

/// Attributes derived from the token path (category/type/item).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenAttributes {
    pub category: Option<String>,
    pub kind: Option<String>,
    pub item: Option<String>,
    pub subitem: Option<String>,
    pub state: Option<String>,
}

/// A token after merge and transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Hierarchical path
    pub path: TokenPath,
    /// Output name (set by the name transform)
    pub name: String,
    /// Transformed value
    pub value: Value,
    /// Transformed dark override
    pub dark: Option<Value>,
    /// Declared type
    pub token_type: Option<String>,
    /// Font formats
    pub formats: Option<Vec<String>>,
    /// Comment or description
    pub comment: Option<String>,
    /// Definition as written, before transforms
    pub original: TokenDefinition,
    /// Path-derived attributes
    pub attributes: TokenAttributes,
    /// Last source file that defined this token
    pub file_path: Option<PathBuf>,
    /// Defined by a theme layer but absent from the base tree
    pub theme_only: bool,
}

impl Token {
    /// Create a token from its path and definition, before transforms.
    ///
    /// The name starts as the unprefixed kebab form of the path, so it is a
    /// valid custom property name even when no name transform runs.
    pub fn new(path: TokenPath, original: TokenDefinition) -> Self {
        Self {
            name: path.to_kebab(None),
            value: original.value.clone(),
            dark: original.dark.clone(),
            token_type: original.token_type.clone(),
            formats: original.formats.clone(),
            comment: original.comment.clone(),
            attributes: TokenAttributes::default(),
            file_path: None,
            theme_only: false,
            path,
            original,
        }
    }

    /// Whether this token lives under `asset.*`.
    pub fn is_asset(&self) -> bool {
        self.path.starts_with(&["asset"])
    }

    /// Whether this token is a font asset (`asset.font.*` with type `font`).
    pub fn is_font_asset(&self) -> bool {
        self.path.starts_with(&["asset", "font"]) && self.token_type.as_deref() == Some(FONT_TYPE)
    }

    /// Whether this token carries a dark-mode override.
    pub fn has_dark(&self) -> bool {
        self.dark.is_some()
    }

    /// Type used by value transforms: the declared type, else the category.
    pub fn effective_type(&self) -> Option<&str> {
        self.token_type.as_deref().or_else(|| self.path.segment(0))
    }
}
