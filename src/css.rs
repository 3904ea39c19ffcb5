//! Stylesheet checks and minification backed by lightningcss

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use thiserror::Error;

/// Error from parsing or printing a generated stylesheet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CssError {
    #[error("generated CSS for {target} does not parse: {message}")]
    Parse { target: String, message: String },
    #[error("failed to print CSS for {target}: {message}")]
    Print { target: String, message: String },
}

/// Parse `css` and fail if it is not a valid stylesheet.
pub fn validate_stylesheet(target: &str, css: &str) -> Result<(), CssError> {
    StyleSheet::parse(css, ParserOptions::default())
        .map(|_| ())
        .map_err(|e| CssError::Parse { target: target.to_string(), message: e.to_string() })
}

/// Re-print `css` without whitespace or comments.
pub fn minify_stylesheet(target: &str, css: &str) -> Result<String, CssError> {
    let sheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| CssError::Parse { target: target.to_string(), message: e.to_string() })?;
    let printed = sheet
        .to_css(PrinterOptions { minify: true, ..PrinterOptions::default() })
        .map_err(|e| CssError::Print { target: target.to_string(), message: e.to_string() })?;
    Ok(printed.code)
}
