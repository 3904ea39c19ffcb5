//! `css/variables`: every selected token in a single `:root` block.

use super::{declaration, render_token_value, Format, FormatArgs, FormatError};
use crate::reference::ColorMode;

pub struct Variables;

impl Format for Variables {
    fn name(&self) -> &'static str {
        "css/variables"
    }

    fn format(&self, args: &FormatArgs<'_>) -> Result<String, FormatError> {
        let mut body = String::new();
        for token in args.tokens {
            let value = render_token_value(args, token, ColorMode::Light)?;
            body.push_str(&declaration("  ", &token.name, &value, token.comment.as_deref()));
        }
        Ok(format!("{}:root {{\n{}}}\n", args.header(), body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::test_support::dictionary;
    use crate::format::FormatOptions;
    use crate::token::Token;
    use serde_json::json;

    fn render(tokens: serde_json::Value, output_references: bool) -> String {
        let dict = dictionary(tokens);
        let selected: Vec<&Token> = dict.iter().collect();
        let options = FormatOptions { file_header: false, output_references, ..FormatOptions::default() };
        let args = FormatArgs { dictionary: &dict, tokens: &selected, options: &options };
        Variables.format(&args).unwrap()
    }

    fn sample() -> serde_json::Value {
        json!({
            "color": {
                "base": {"red": {"value": "#F00"}},
                "danger": {"value": "{color.base.red}", "comment": "errors"}
            },
            "border": {"danger": {"value": "1px solid {color.danger}"}}
        })
    }

    #[test]
    fn test_output_references() {
        let css = render(sample(), true);
        assert_eq!(
            css,
            ":root {\n  --color-base-red: #ff0000;\n  --color-danger: var(--color-base-red); /* errors */\n  --border-danger: 1px solid var(--color-danger);\n}\n"
        );
    }

    #[test]
    fn test_resolved_values() {
        let css = render(sample(), false);
        assert!(css.contains("--color-danger: #ff0000; /* errors */"));
        assert!(css.contains("--border-danger: 1px solid #ff0000;"));
    }

    #[test]
    fn test_one_declaration_per_token() {
        let css = render(sample(), true);
        for name in ["--color-base-red:", "--color-danger:", "--border-danger:"] {
            assert_eq!(css.matches(name).count(), 1, "{} should appear once", name);
        }
    }

    #[test]
    fn test_empty_selection() {
        let css = render(json!({}), true);
        assert_eq!(css, ":root {\n}\n");
    }
}
