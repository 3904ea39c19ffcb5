//! `css/font-face`: one `@font-face` rule per font asset token.
//!
//! Family, weight and style come from the token path
//! (`asset.font.<family>.<weight>.<style>`); the token value is the font file
//! path without extension.

use super::{render_token_value, Format, FormatArgs, FormatError};
use crate::reference::ColorMode;

/// Map a font file extension to its CSS `format()` hint.
pub fn css_font_format(extension: &str) -> &str {
    match extension {
        "ttf" => "truetype",
        "otf" => "opentype",
        "eot" => "embedded-opentype",
        other => other,
    }
}

pub struct FontFace;

impl Format for FontFace {
    fn name(&self) -> &'static str {
        "css/font-face"
    }

    fn format(&self, args: &FormatArgs<'_>) -> Result<String, FormatError> {
        let options = args.options;
        let mut blocks = Vec::new();

        for token in args.tokens.iter().filter(|t| t.is_font_asset()) {
            let family = token
                .path
                .segment(2)
                .ok_or_else(|| FormatError::InvalidFontPath { name: token.name.clone() })?;
            let weight = token.path.segment(3).unwrap_or("normal");
            let style = token.path.segment(4).unwrap_or("normal");
            let url = render_token_value(args, token, ColorMode::Light)?;

            let formats = match &token.formats {
                Some(formats) if !formats.is_empty() => formats,
                _ => &options.default_font_formats,
            };
            let src: Vec<String> = formats
                .iter()
                .map(|ext| {
                    format!(
                        "url(\"{}{}.{}\") format(\"{}\")",
                        options.font_path_prefix,
                        url,
                        ext,
                        css_font_format(ext)
                    )
                })
                .collect();

            blocks.push(format!(
                "@font-face {{\n  font-family: \"{}\";\n  font-style: {};\n  font-weight: {};\n  font-display: {};\n  src: {};\n}}\n",
                family,
                style,
                weight,
                options.font_display,
                src.join(", ")
            ));
        }

        if blocks.is_empty() {
            return Ok(String::new());
        }

        Ok(format!("{}{}", args.header(), blocks.join("\n")))
    }
}
