//! `css/dark-mode-variables`: light and dark custom-property blocks.
//!
//! Every selected token goes into the light block. Tokens with a `dark`
//! override also go into the dark block and, when enabled, into a
//! `prefers-color-scheme: dark` fallback that only applies while no explicit
//! mode attribute is set on the root element.

use super::{declaration, render_token_value, Format, FormatArgs, FormatError};
use crate::reference::ColorMode;

pub struct DarkModeVariables;

impl Format for DarkModeVariables {
    fn name(&self) -> &'static str {
        "css/dark-mode-variables"
    }

    fn format(&self, args: &FormatArgs<'_>) -> Result<String, FormatError> {
        let options = args.options;

        let mut light = String::new();
        for token in args.tokens {
            let value = render_token_value(args, token, ColorMode::Light)?;
            light.push_str(&declaration("  ", &token.name, &value, token.comment.as_deref()));
        }

        let mut dark_declarations = Vec::new();
        for token in args.tokens.iter().filter(|t| t.has_dark()) {
            let value = render_token_value(args, token, ColorMode::Dark)?;
            dark_declarations.push((token.name.as_str(), value));
        }

        let mut blocks = vec![format!("{} {{\n{}}}\n", options.light_selector, light)];

        if !dark_declarations.is_empty() {
            let dark: String = dark_declarations
                .iter()
                .map(|(name, value)| declaration("  ", name, value, None))
                .collect();
            blocks.push(format!("{} {{\n{}}}\n", options.dark_selector, dark));

            if options.media_query_fallback {
                let fallback: String = dark_declarations
                    .iter()
                    .map(|(name, value)| declaration("    ", name, value, None))
                    .collect();
                blocks.push(format!(
                    "@media (prefers-color-scheme: dark) {{\n  :root:not([{}]) {{\n{}  }}\n}}\n",
                    options.mode_attribute, fallback
                ));
            }
        }

        Ok(format!("{}{}", args.header(), blocks.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::test_support::dictionary;
    use crate::format::{FormatOptions, FILE_HEADER};
    use crate::token::Token;
    use serde_json::json;

    fn render(tokens: serde_json::Value, options: FormatOptions) -> String {
        let dict = dictionary(tokens);
        let selected: Vec<&Token> = dict.iter().collect();
        let args = FormatArgs { dictionary: &dict, tokens: &selected, options: &options };
        DarkModeVariables.format(&args).unwrap()
    }

    /// Declarations inside the block that starts with `opening`.
    fn block<'a>(css: &'a str, opening: &str) -> Vec<&'a str> {
        let start = css.find(opening).unwrap_or_else(|| panic!("no block {}", opening));
        css[start + opening.len()..]
            .lines()
            .map(str::trim)
            .take_while(|l| !l.starts_with('}'))
            .filter(|l| l.starts_with("--"))
            .collect()
    }

    #[test]
    fn test_full_output() {
        let css = render(
            json!({"color": {
                "bg": {"value": "#ffffff", "dark": "#000000"},
                "accent": {"value": "#ff00ff"}
            }}),
            FormatOptions::default(),
        );

        let expected = format!(
            "{}:root, [data-color-mode=\"light\"] {{\n  --color-bg: #ffffff;\n  --color-accent: #ff00ff;\n}}\n\n[data-color-mode=\"dark\"] {{\n  --color-bg: #000000;\n}}\n\n@media (prefers-color-scheme: dark) {{\n  :root:not([data-color-mode]) {{\n    --color-bg: #000000;\n  }}\n}}\n",
            FILE_HEADER
        );
        assert_eq!(css, expected);
    }

    #[test]
    fn test_token_without_dark_only_in_light_block() {
        let css = render(
            json!({"color": {
                "bg": {"value": "#fff", "dark": "#000"},
                "accent": {"value": "#f0f"}
            }}),
            FormatOptions::default(),
        );

        let light = block(&css, ":root, [data-color-mode=\"light\"] {");
        let dark = block(&css, "[data-color-mode=\"dark\"] {");
        assert!(light.iter().any(|l| l.starts_with("--color-accent:")));
        assert!(light.iter().any(|l| l.starts_with("--color-bg:")));
        assert_eq!(dark, vec!["--color-bg: #000000;"]);
    }

    #[test]
    fn test_fallback_mirrors_dark_block() {
        let css = render(
            json!({
                "color": {
                    "base": {"black": {"value": "#000"}},
                    "bg": {"value": "#fff", "dark": "{color.base.black}"},
                    "text": {"value": "#111", "dark": "#eee"}
                }
            }),
            FormatOptions::default(),
        );

        let dark = block(&css, "[data-color-mode=\"dark\"] {");
        let fallback = block(&css, ":root:not([data-color-mode]) {");
        assert_eq!(dark.len(), 2);
        assert_eq!(dark, fallback);
    }

    #[test]
    fn test_fallback_disabled() {
        let css = render(
            json!({"bg": {"value": "#fff", "dark": "#000", "type": "color"}}),
            FormatOptions { media_query_fallback: false, ..FormatOptions::default() },
        );
        assert!(!css.contains("prefers-color-scheme"));
        assert!(css.contains("[data-color-mode=\"dark\"]"));
    }

    #[test]
    fn test_no_dark_overrides_emits_light_only() {
        let css = render(
            json!({"spacing": {"sm": {"value": 0.5}}}),
            FormatOptions { file_header: false, ..FormatOptions::default() },
        );
        assert_eq!(css, ":root, [data-color-mode=\"light\"] {\n  --spacing-sm: 0.5rem;\n}\n");
    }

    #[test]
    fn test_custom_selectors() {
        let css = render(
            json!({"bg": {"value": "white", "dark": "black"}}),
            FormatOptions {
                file_header: false,
                light_selector: ":root".to_string(),
                dark_selector: "[data-theme-mode=\"dark\"]".to_string(),
                mode_attribute: "data-theme-mode".to_string(),
                ..FormatOptions::default()
            },
        );
        assert!(css.starts_with(":root {\n"));
        assert!(css.contains("[data-theme-mode=\"dark\"] {\n  --bg: black;\n}"));
        assert!(css.contains(":root:not([data-theme-mode])"));
    }

    #[test]
    fn test_comments_in_light_block() {
        let css = render(
            json!({"bg": {"value": "white", "comment": "page background"}}),
            FormatOptions { file_header: false, ..FormatOptions::default() },
        );
        assert!(css.contains("--bg: white; /* page background */"));
    }
}
