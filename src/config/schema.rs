//! Configuration schema types for `tokens.toml`
//!
//! Defines the structure and validation rules for tokensmith project configuration.

use crate::format::FormatOptions;
use crate::transform::{builtin, CSS_TRANSFORM_GROUP};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
    /// Token source directory (contains base/, components/, themes/)
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// CSS output directory
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

fn default_src() -> PathBuf {
    PathBuf::from("tokens")
}

fn default_out() -> PathBuf {
    PathBuf::from("dist/css")
}

fn default_true() -> bool {
    true
}

/// CSS platform settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CssConfig {
    /// Prefix for generated custom property names
    #[serde(default)]
    pub prefix: String,
    /// Write the "do not edit" header
    #[serde(default = "default_true")]
    pub file_header: bool,
    /// Selector for light-mode variables
    #[serde(default = "default_light_selector")]
    pub light_selector: String,
    /// Selector for dark-mode variables
    #[serde(default = "default_dark_selector")]
    pub dark_selector: String,
    /// Attribute that marks an explicit color mode
    #[serde(default = "default_mode_attribute")]
    pub mode_attribute: String,
    /// Emit a `prefers-color-scheme: dark` fallback
    #[serde(default = "default_true")]
    pub media_query_fallback: bool,
    /// Transform names, applied in order
    #[serde(default = "default_transforms")]
    pub transforms: Vec<String>,
    /// Minify written stylesheets
    #[serde(default)]
    pub minify: bool,
    /// Parse every generated stylesheet before writing
    #[serde(default = "default_true")]
    pub validate_output: bool,
}

fn default_light_selector() -> String {
    ":root, [data-color-mode=\"light\"]".to_string()
}

fn default_dark_selector() -> String {
    "[data-color-mode=\"dark\"]".to_string()
}

fn default_mode_attribute() -> String {
    "data-color-mode".to_string()
}

fn default_transforms() -> Vec<String> {
    CSS_TRANSFORM_GROUP.iter().map(|s| s.to_string()).collect()
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            file_header: true,
            light_selector: default_light_selector(),
            dark_selector: default_dark_selector(),
            mode_attribute: default_mode_attribute(),
            media_query_fallback: true,
            transforms: default_transforms(),
            minify: false,
            validate_output: true,
        }
    }
}

/// Font asset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontsConfig {
    /// `font-display` descriptor
    #[serde(default = "default_font_display")]
    pub display: String,
    /// Prefix prepended to font URLs
    #[serde(default)]
    pub path_prefix: String,
    /// Formats used when a font token declares none
    #[serde(default = "default_font_formats")]
    pub default_formats: Vec<String>,
}

fn default_font_display() -> String {
    "swap".to_string()
}

fn default_font_formats() -> Vec<String> {
    vec!["woff2".to_string()]
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            display: default_font_display(),
            path_prefix: String::new(),
            default_formats: default_font_formats(),
        }
    }
}

/// Theme settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemesConfig {
    /// Theme whose values represent `vars.css` (defaults to the first theme)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
}

/// Validation settings for the build process
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidateConfig {
    /// Treat token collisions between base files as errors
    #[serde(default)]
    pub strict: bool,
}

/// Watch mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Clear terminal between rebuilds
    #[serde(default = "default_true")]
    pub clear_screen: bool,
}

fn default_debounce_ms() -> u32 {
    100
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100, clear_screen: true }
    }
}

/// Complete tokens.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokensConfig {
    /// Project metadata (required)
    pub project: ProjectConfig,
    /// CSS platform settings
    #[serde(default)]
    pub css: CssConfig,
    /// Font settings
    #[serde(default)]
    pub fonts: FontsConfig,
    /// Theme settings
    #[serde(default)]
    pub themes: ThemesConfig,
    /// Validation settings
    #[serde(default)]
    pub validate: ValidateConfig,
    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "css.transforms")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tokens.toml: '{}' {}", self.field, self.message)
    }
}

impl TokensConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.name.is_empty() {
            errors.push(ConfigValidationError {
                field: "project.name".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        for name in &self.css.transforms {
            if builtin(name).is_none() {
                errors.push(ConfigValidationError {
                    field: "css.transforms".to_string(),
                    message: format!(
                        "unknown transform '{}' (available: {})",
                        name,
                        CSS_TRANSFORM_GROUP.join(", ")
                    ),
                });
            }
        }

        if self.css.light_selector.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "css.light_selector".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.css.dark_selector.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "css.dark_selector".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.css.mode_attribute.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "css.mode_attribute".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.fonts.default_formats.is_empty() {
            errors.push(ConfigValidationError {
                field: "fonts.default_formats".to_string(),
                message: "must contain at least one format".to_string(),
            });
        }

        if let Some(primary) = &self.themes.primary {
            if primary.is_empty() {
                errors.push(ConfigValidationError {
                    field: "themes.primary".to_string(),
                    message: "must be a theme name".to_string(),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Format options derived from the `[css]` and `[fonts]` sections.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            file_header: self.css.file_header,
            output_references: false,
            light_selector: self.css.light_selector.clone(),
            dark_selector: self.css.dark_selector.clone(),
            mode_attribute: self.css.mode_attribute.clone(),
            media_query_fallback: self.css.media_query_fallback,
            font_display: self.fonts.display.clone(),
            font_path_prefix: self.fonts.path_prefix.clone(),
            default_font_formats: self.fonts.default_formats.clone(),
        }
    }

    /// Name prefix, if one is configured.
    pub fn prefix(&self) -> Option<&str> {
        Some(self.css.prefix.as_str()).filter(|p| !p.is_empty())
    }
}
