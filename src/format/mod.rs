//! Output formats
//!
//! A format turns a set of selected tokens into the text of one output file.
//! Formats are looked up by name, so a file target only needs to carry the
//! name of the format it renders with.
//!
//! Built-in formats:
//! - `css/font-face` - `@font-face` rules for font assets
//! - `css/dark-mode-variables` - light and dark custom-property blocks
//! - `css/variables` - a flat `:root` block

pub mod dark_mode;
pub mod font_face;
pub mod variables;

pub use dark_mode::DarkModeVariables;
pub use font_face::FontFace;
pub use variables::Variables;

use crate::dictionary::Dictionary;
use crate::reference::{css_text, ColorMode, ReferenceError, ReferenceResolver};
use crate::token::Token;
use serde_json::Value;
use thiserror::Error;

/// Header written at the top of every generated file.
pub const FILE_HEADER: &str = "/**\n * Do not edit directly, this file was auto-generated.\n */\n\n";

/// Names of the built-in formats.
pub const FORMAT_NAMES: &[&str] = &["css/font-face", "css/dark-mode-variables", "css/variables"];

/// Error while rendering a format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Value has no CSS text form
    #[error("Token '{name}' has a composite value with no CSS form")]
    UnsupportedValue { name: String },
    /// Reference could not be resolved
    #[error("Token '{name}': {source}")]
    Reference {
        name: String,
        #[source]
        source: ReferenceError,
    },
    /// Font asset path has no family segment
    #[error("Font token '{name}' must be at least asset.font.<family>")]
    InvalidFontPath { name: String },
    /// No format registered under this name
    #[error("Unknown format '{0}'. Available: {}", FORMAT_NAMES.join(", "))]
    UnknownFormat(String),
}

/// Options that shape the rendered CSS.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Prepend [`FILE_HEADER`]
    pub file_header: bool,
    /// Keep references as `var(--name)` instead of resolving them
    pub output_references: bool,
    /// Selector for the light block
    pub light_selector: String,
    /// Selector for the dark block
    pub dark_selector: String,
    /// Attribute that carries an explicit color mode
    pub mode_attribute: String,
    /// Emit the `prefers-color-scheme: dark` fallback block
    pub media_query_fallback: bool,
    /// `font-display` descriptor for `@font-face`
    pub font_display: String,
    /// Prefix for font URLs
    pub font_path_prefix: String,
    /// Formats used when a font token declares none
    pub default_font_formats: Vec<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            file_header: true,
            output_references: false,
            light_selector: ":root, [data-color-mode=\"light\"]".to_string(),
            dark_selector: "[data-color-mode=\"dark\"]".to_string(),
            mode_attribute: "data-color-mode".to_string(),
            media_query_fallback: true,
            font_display: "swap".to_string(),
            font_path_prefix: String::new(),
            default_font_formats: vec!["woff2".to_string()],
        }
    }
}

/// Input to a format.
pub struct FormatArgs<'a> {
    /// Full dictionary, used to resolve references
    pub dictionary: &'a Dictionary,
    /// Tokens selected by the target's filter, in dictionary order
    pub tokens: &'a [&'a Token],
    pub options: &'a FormatOptions,
}

impl<'a> FormatArgs<'a> {
    pub fn resolver(&self) -> ReferenceResolver<'a> {
        ReferenceResolver::new(self.dictionary)
    }

    /// Header text, or an empty string when disabled.
    pub fn header(&self) -> &'static str {
        if self.options.file_header {
            FILE_HEADER
        } else {
            ""
        }
    }
}

/// A named output format.
pub trait Format {
    /// Registry name, e.g. `css/variables`.
    fn name(&self) -> &'static str;

    /// Render the selected tokens to file contents.
    fn format(&self, args: &FormatArgs<'_>) -> Result<String, FormatError>;
}

/// Look up a built-in format by name.
pub fn builtin(name: &str) -> Result<Box<dyn Format>, FormatError> {
    match name {
        "css/font-face" => Ok(Box::new(FontFace)),
        "css/dark-mode-variables" => Ok(Box::new(DarkModeVariables)),
        "css/variables" => Ok(Box::new(Variables)),
        _ => Err(FormatError::UnknownFormat(name.to_string())),
    }
}

/// Render a token's value (or dark override) as CSS text.
///
/// With `output_references` set, references become `var(--name)`;
/// otherwise they are resolved in the given mode.
pub(crate) fn render_token_value(
    args: &FormatArgs<'_>,
    token: &Token,
    mode: ColorMode,
) -> Result<String, FormatError> {
    let resolver = args.resolver();
    let reference_error =
        |source: ReferenceError| FormatError::Reference { name: token.name.clone(), source };

    let value: Value = if args.options.output_references {
        let raw = match mode {
            ColorMode::Light => &token.value,
            ColorMode::Dark => token.dark.as_ref().unwrap_or(&token.value),
        };
        resolver.output_references(raw).map_err(reference_error)?
    } else {
        resolver.resolve_token(token, mode).map_err(reference_error)?
    };

    css_text(&value).ok_or_else(|| FormatError::UnsupportedValue { name: token.name.clone() })
}

/// A `--name: value;` line with the given indent.
pub(crate) fn declaration(indent: &str, name: &str, value: &str, comment: Option<&str>) -> String {
    match comment {
        Some(comment) => format!("{}--{}: {}; /* {} */\n", indent, name, value, comment),
        None => format!("{}--{}: {};\n", indent, name, value),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::dictionary::Dictionary;
    use crate::source::TokenTree;
    use crate::transform::{TransformChain, TransformOptions};
    use serde_json::Value;
    use std::path::Path;

    /// Build a css-transformed dictionary from a JSON literal.
    pub fn dictionary(tokens: Value) -> Dictionary {
        let mut tree = TokenTree::new();
        match tokens {
            Value::Object(map) => {
                tree.merge(map, Path::new("tokens.json"));
            }
            _ => panic!("not an object"),
        }
        Dictionary::from_tree(&tree, &TransformChain::css(TransformOptions::default())).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_lookup() {
        for name in FORMAT_NAMES {
            assert_eq!(builtin(name).unwrap().name(), *name);
        }
        let err = builtin("scss/map").err().unwrap();
        assert!(err.to_string().contains("scss/map"));
    }

    #[test]
    fn test_declaration() {
        assert_eq!(declaration("  ", "a", "1", None), "  --a: 1;\n");
        assert_eq!(declaration("", "a", "1", Some("note")), "--a: 1; /* note */\n");
    }

    #[test]
    fn test_render_token_value_modes() {
        let dict = test_support::dictionary(json!({
            "color": {
                "white": {"value": "#fff"},
                "bg": {"value": "{color.white}", "dark": "#000"}
            }
        }));
        let tokens: Vec<&Token> = dict.iter().collect();
        let options = FormatOptions::default();
        let args = FormatArgs { dictionary: &dict, tokens: &tokens, options: &options };
        let bg = dict.get("color-bg").unwrap();

        assert_eq!(render_token_value(&args, bg, ColorMode::Light).unwrap(), "#ffffff");
        assert_eq!(render_token_value(&args, bg, ColorMode::Dark).unwrap(), "#000000");

        let options = FormatOptions { output_references: true, ..FormatOptions::default() };
        let args = FormatArgs { dictionary: &dict, tokens: &tokens, options: &options };
        assert_eq!(render_token_value(&args, bg, ColorMode::Light).unwrap(), "var(--color-white)");
    }

    #[test]
    fn test_render_composite_value_fails() {
        let dict = test_support::dictionary(json!({"shadow": {"value": {"x": 1}}}));
        let tokens: Vec<&Token> = dict.iter().collect();
        let options = FormatOptions::default();
        let args = FormatArgs { dictionary: &dict, tokens: &tokens, options: &options };
        let err = render_token_value(&args, tokens[0], ColorMode::Light).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedValue { ref name } if name == "shadow"));
    }
}
