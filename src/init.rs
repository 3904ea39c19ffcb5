//! Project initialization for tokensmith
//!
//! Scaffolds `tokens.toml` and a small token tree that builds out of the box.

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error during project initialization
#[derive(Debug, Error)]
pub enum InitError {
    /// Directory already exists and is not empty
    #[error("Directory already exists: {0}")]
    DirectoryExists(String),
    #[error("Failed to create directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("Failed to write file: {0}")]
    WriteFile(#[source] std::io::Error),
}

/// Files written by [`init_project`], relative to the project root.
pub const STARTER_FILES: &[&str] = &[
    "tokens.toml",
    ".gitignore",
    "tokens/base/color.json",
    "tokens/base/size.json",
    "tokens/base/font.json",
    "tokens/components/button.json",
    "tokens/themes/light.json",
    "tokens/themes/dark.json",
];

/// Initialize a new token project.
///
/// # Arguments
/// - `path` - Directory to create the project in (must be missing or empty)
/// - `name` - Project name (used in tokens.toml)
///
/// # Example
/// ```ignore
/// init_project(Path::new("design-tokens"), "design-tokens")?;
/// ```
pub fn init_project(path: &Path, name: &str) -> Result<(), InitError> {
    if path.exists() {
        let is_empty = path.read_dir().map(|mut d| d.next().is_none()).unwrap_or(false);
        if !is_empty {
            return Err(InitError::DirectoryExists(path.display().to_string()));
        }
    }

    create_dir(&path.join("tokens/base"))?;
    create_dir(&path.join("tokens/components"))?;
    create_dir(&path.join("tokens/themes"))?;

    write_file(&path.join("tokens.toml"), &generate_config(name))?;
    write_file(&path.join(".gitignore"), "/dist/\n")?;
    write_file(&path.join("tokens/base/color.json"), BASE_COLOR)?;
    write_file(&path.join("tokens/base/size.json"), BASE_SIZE)?;
    write_file(&path.join("tokens/base/font.json"), BASE_FONT)?;
    write_file(&path.join("tokens/components/button.json"), COMPONENT_BUTTON)?;
    write_file(&path.join("tokens/themes/light.json"), THEME_LIGHT)?;
    write_file(&path.join("tokens/themes/dark.json"), THEME_DARK)?;

    Ok(())
}

/// Create a directory and all parent directories.
fn create_dir(path: &Path) -> Result<(), InitError> {
    fs::create_dir_all(path).map_err(InitError::CreateDir)
}

/// Write content to a file.
fn write_file(path: &Path, content: &str) -> Result<(), InitError> {
    fs::write(path, content).map_err(InitError::WriteFile)
}

fn generate_config(name: &str) -> String {
    format!(
        r#"[project]
name = "{}"
src = "tokens"
out = "dist/css"

[css]
prefix = ""
media_query_fallback = true

[fonts]
display = "swap"
default_formats = ["woff2"]
"#,
        name
    )
}

const BASE_COLOR: &str = r##"{
  "color": {
    "base": {
      "white": { "value": "#fff" },
      "black": { "value": "#000" },
      "gray": {
        "100": { "value": "#f5f5f5" },
        "900": { "value": "#1a1a1a" }
      },
      "blue": { "value": "#2563EB" }
    },
    "background": {
      "value": "{color.base.white}",
      "dark": "{color.base.gray.900}",
      "comment": "Page background"
    },
    "text": {
      "value": "{color.base.gray.900}",
      "dark": "{color.base.gray.100}"
    }
  }
}
"##;

const BASE_SIZE: &str = r#"{
  "size": {
    "font": {
      "base": { "value": 1 },
      "large": { "value": 1.25 }
    }
  },
  "spacing": {
    "none": { "value": 0 },
    "sm": { "value": 0.5 },
    "md": { "value": 1 }
  }
}
"#;

const BASE_FONT: &str = r#"{
  "asset": {
    "font": {
      "inter": {
        "400": {
          "normal": { "value": "fonts/Inter-Regular", "type": "font", "formats": ["woff2", "woff"] }
        }
      }
    }
  },
  "font": {
    "family": {
      "base": { "value": ["Inter", "Helvetica Neue", "sans-serif"], "type": "fontFamily" }
    }
  }
}
"#;

const COMPONENT_BUTTON: &str = r#"{
  "button": {
    "background": { "value": "{color.base.blue}" },
    "padding": { "value": "{spacing.sm} {spacing.md}" }
  }
}
"#;

const THEME_LIGHT: &str = r##"{
  "color": {
    "accent": { "value": "{color.base.blue}" }
  }
}
"##;

const THEME_DARK: &str = r##"{
  "color": {
    "accent": { "value": "#60a5fa" },
    "background": { "value": "{color.base.gray.900}", "dark": "{color.base.black}" }
  }
}
"##;
