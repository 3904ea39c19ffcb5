//! List command: print resolved tokens

use serde::Serialize;
use std::process::ExitCode;

use super::build::load_project;
use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::build::{BuildContext, BuildPipeline};
use crate::dictionary::Dictionary;
use crate::reference::{css_text, ColorMode, ReferenceResolver};

/// One row of `tokensmith list` output.
#[derive(Debug, Serialize)]
struct TokenListing {
    name: String,
    path: String,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    dark: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    theme_only: bool,
}

fn listings(dictionary: &Dictionary) -> Result<Vec<TokenListing>, String> {
    let resolver = ReferenceResolver::new(dictionary);
    let render = |value: serde_json::Value| css_text(&value).unwrap_or_else(|| value.to_string());

    dictionary
        .iter()
        .map(|token| {
            let value = resolver
                .resolve_token(token, ColorMode::Light)
                .map_err(|e| format!("{}: {}", token.name, e))?;
            let dark = match token.dark {
                Some(_) => Some(
                    resolver
                        .resolve_token(token, ColorMode::Dark)
                        .map_err(|e| format!("{}: {}", token.name, e))?,
                ),
                None => None,
            };
            Ok(TokenListing {
                name: token.name.clone(),
                path: token.path.to_string(),
                value: render(value),
                dark: dark.map(render),
                token_type: token.token_type.clone(),
                file: token.file_path.as_ref().map(|p| p.display().to_string()),
                theme_only: token.theme_only,
            })
        })
        .collect()
}

/// Run the list command
pub fn run_list(theme: Option<&str>, json: bool) -> ExitCode {
    let (config, project_root) = match load_project(false) {
        Ok(project) => project,
        Err(code) => return code,
    };

    let pipeline = BuildPipeline::new(BuildContext::new(config, project_root));
    let tokens = match pipeline.load() {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let dictionary = match theme {
        None => &tokens.base_dictionary,
        Some(name) => match tokens.theme(name) {
            Some(themed) => &themed.dictionary,
            None => {
                let available: Vec<_> = tokens.themes.iter().map(|t| t.theme.name.as_str()).collect();
                eprintln!("Error: Unknown theme '{}' (available: {})", name, available.join(", "));
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };

    let rows = match listings(dictionary) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        match serde_json::to_string_pretty(&rows) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
        for row in &rows {
            match &row.dark {
                Some(dark) => {
                    println!("--{:<width$}  {}  (dark: {})", row.name, row.value, dark, width = width)
                }
                None => println!("--{:<width$}  {}", row.name, row.value, width = width),
            }
        }
        println!();
        println!("{} tokens", rows.len());
    }

    ExitCode::from(EXIT_SUCCESS)
}
