//! Configuration loading and discovery for `tokens.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{
    CssConfig, FontsConfig, ProjectConfig, ThemesConfig, TokensConfig, ValidateConfig,
    WatchConfig,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "tokens.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse tokens.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override source directory
    pub src: Option<PathBuf>,
    /// Enable strict collision checks
    pub strict: Option<bool>,
    /// Minify written stylesheets
    pub minify: Option<bool>,
}

/// Find tokens.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    find_config_from(cwd)
}

/// Find tokens.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a tokens.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns a default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<TokensConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<TokensConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: TokensConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Create a default configuration when no tokens.toml is found.
///
/// The project name is the current directory name; everything else uses the
/// documented defaults (`tokens/` in, `dist/css/` out).
pub fn default_config() -> TokensConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unnamed".to_string());

    TokensConfig {
        project: ProjectConfig {
            name: project_name,
            src: PathBuf::from("tokens"),
            out: PathBuf::from("dist/css"),
        },
        css: CssConfig::default(),
        fonts: FontsConfig::default(),
        themes: ThemesConfig::default(),
        validate: ValidateConfig::default(),
        watch: WatchConfig::default(),
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut TokensConfig, overrides: &CliOverrides) {
    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }

    if let Some(ref src) = overrides.src {
        config.project.src = src.clone();
    }

    if let Some(strict) = overrides.strict {
        config.validate.strict = strict;
    }

    if let Some(minify) = overrides.minify {
        config.css.minify = minify;
    }
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("tokens.toml");
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"[project]\nname = \"test\"")
            .expect("should write config content");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("tokens.toml");
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"[project]\nname = \"test\"")
            .expect("should write config content");

        let subdir = temp.path().join("tokens").join("base");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("tokens.toml");
        File::create(&config_path)
            .expect("should create config file")
            .write_all(
                br#"
[project]
name = "design-system"
out = "build/css"

[css]
prefix = "ds"

[themes]
primary = "brand"
"#,
            )
            .expect("should write config content");

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.project.name, "design-system");
        assert_eq!(config.project.out, PathBuf::from("build/css"));
        assert_eq!(config.css.prefix, "ds");
        assert_eq!(config.themes.primary.as_deref(), Some("brand"));
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("nonexistent.toml");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("tokens.toml");
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"this is not valid toml {{{")
            .expect("should write invalid config");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("tokens.toml");
        File::create(&config_path)
            .expect("should create config file")
            .write_all(
                br#"
[project]
name = ""

[css]
transforms = ["size/px"]
"#,
            )
            .expect("should write invalid config");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides_paths() {
        let mut config = default_config();
        let overrides = CliOverrides {
            out: Some(PathBuf::from("public")),
            src: Some(PathBuf::from("design")),
            ..Default::default()
        };

        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.project.out, PathBuf::from("public"));
        assert_eq!(config.project.src, PathBuf::from("design"));
    }

    #[test]
    fn test_merge_cli_overrides_flags() {
        let mut config = default_config();
        assert!(!config.validate.strict);
        assert!(!config.css.minify);

        let overrides = CliOverrides { strict: Some(true), minify: Some(true), ..Default::default() };

        merge_cli_overrides(&mut config, &overrides);
        assert!(config.validate.strict);
        assert!(config.css.minify);
    }

    #[test]
    fn test_merge_cli_overrides_none_keeps_config() {
        let mut config = default_config();
        config.validate.strict = true;
        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert!(config.validate.strict);
        assert_eq!(config.project.out, PathBuf::from("dist/css"));
    }

    #[test]
    fn test_resolve_path_absolute() {
        let root = Path::new("/project");
        let absolute = Path::new("/other/path");
        assert_eq!(resolve_path(root, absolute), PathBuf::from("/other/path"));
    }

    #[test]
    fn test_resolve_path_relative() {
        let root = Path::new("/project");
        assert_eq!(resolve_path(root, Path::new("tokens")), PathBuf::from("/project/tokens"));
    }

    #[test]
    fn test_project_root() {
        let config_path = Path::new("/project/tokens.toml");
        assert_eq!(project_root(config_path), Some(Path::new("/project")));
    }

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert!(!config.project.name.is_empty());
        assert_eq!(config.project.src, PathBuf::from("tokens"));
        assert_eq!(config.project.out, PathBuf::from("dist/css"));
        assert!(config.is_valid());
    }

    #[test]
    #[serial]
    fn test_find_config_from_working_directory() {
        let temp = TempDir::new().expect("should create temp dir");
        let nested = temp.path().join("tokens/base");
        std::fs::create_dir_all(&nested).expect("should create nested dir");
        std::fs::write(temp.path().join(CONFIG_FILE), "[project]\nname = \"cwd\"")
            .expect("should write config");

        let original_dir = env::current_dir().expect("should read cwd");
        env::set_current_dir(&nested).expect("should enter nested dir");
        let found = find_config();
        env::set_current_dir(original_dir).expect("should restore cwd");

        let found = found.expect("should find config");
        assert_eq!(found.file_name().and_then(|n| n.to_str()), Some(CONFIG_FILE));
        assert_eq!(
            found.parent().map(|p| p.canonicalize().unwrap()),
            Some(temp.path().canonicalize().unwrap())
        );
    }
}
