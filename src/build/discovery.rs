//! Source file discovery for the build system.
//!
//! Finds token files under the `base/`, `components/` and `themes/`
//! directories of the configured source directory.

use crate::build::BuildContext;
use crate::source::is_token_file;
use crate::theme::ThemeSource;
use glob::{glob, Pattern};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Directory holding shared base tokens.
pub const BASE_DIR: &str = "base";
/// Directory holding component tokens.
pub const COMPONENTS_DIR: &str = "components";
/// Directory holding one file per theme.
pub const THEMES_DIR: &str = "themes";

/// Error during source discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Invalid glob pattern
    #[error("Invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, #[source] glob::PatternError),
    /// The themes directory is missing or holds no token files
    #[error("No theme files found in {}", .0.display())]
    NoThemes(PathBuf),
    /// Two theme files share a name (e.g. `dark.json` and `dark.json5`)
    #[error("Theme '{0}' is defined by more than one file")]
    DuplicateTheme(String),
}

/// Token files found under the source directory.
#[derive(Debug, Clone, Default)]
pub struct TokenSources {
    /// Files under `base/`, sorted
    pub base: Vec<PathBuf>,
    /// Files under `components/`, sorted
    pub components: Vec<PathBuf>,
    /// Theme files directly under `themes/`, sorted by file name
    pub themes: Vec<ThemeSource>,
}

impl TokenSources {
    /// Base then component files, in merge order.
    pub fn shared_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.base.iter().chain(self.components.iter())
    }

    /// Every source file, including themes.
    pub fn all_files(&self) -> Vec<&Path> {
        self.shared_files()
            .map(PathBuf::as_path)
            .chain(self.themes.iter().map(|t| t.path.as_path()))
            .collect()
    }
}

/// Discover token files matching a glob pattern.
///
/// `base_dir` is matched literally, so project paths containing `[`, `*` or
/// `?` work; only `pattern` is a glob.
///
/// # Arguments
/// - `base_dir` - Base directory to resolve patterns from
/// - `pattern` - Glob pattern to match
///
/// # Returns
/// Sorted list of matching token files.
pub fn discover_files(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let escaped_dir = PathBuf::from(Pattern::escape(&base_dir.to_string_lossy()));
    let full_pattern = escaped_dir.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let paths =
        glob(&pattern_str).map_err(|e| DiscoveryError::InvalidPattern(pattern.to_string(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() && is_token_file(&path) {
                    files.push(path);
                }
            }
            Err(e) => {
                warn!("error reading path: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Discover every token file below `dir` (recursive). A missing directory is
/// an empty set.
fn discover_tree(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "source directory not present");
        return Ok(Vec::new());
    }
    discover_files(dir, "**/*")
}

/// Discover theme files directly under `dir`.
///
/// Fails when the directory is missing or contains no token files.
pub fn discover_themes(dir: &Path) -> Result<Vec<ThemeSource>, DiscoveryError> {
    if !dir.is_dir() {
        return Err(DiscoveryError::NoThemes(dir.to_path_buf()));
    }

    let files = discover_files(dir, "*")?;
    let mut seen = HashSet::new();
    let mut themes = Vec::new();
    for path in files {
        let Some(theme) = ThemeSource::from_path(&path) else {
            warn!(path = %path.display(), "skipping theme file without a usable name");
            continue;
        };
        if !seen.insert(theme.name.clone()) {
            return Err(DiscoveryError::DuplicateTheme(theme.name));
        }
        themes.push(theme);
    }

    if themes.is_empty() {
        return Err(DiscoveryError::NoThemes(dir.to_path_buf()));
    }
    Ok(themes)
}

/// Discover all token sources for a build.
pub fn discover_sources(ctx: &BuildContext) -> Result<TokenSources, DiscoveryError> {
    let src_dir = ctx.src_dir();

    let sources = TokenSources {
        base: discover_tree(&src_dir.join(BASE_DIR))?,
        components: discover_tree(&src_dir.join(COMPONENTS_DIR))?,
        themes: discover_themes(&src_dir.join(THEMES_DIR))?,
    };

    debug!(
        base = sources.base.len(),
        components = sources.components.len(),
        themes = sources.themes.len(),
        "discovered token sources"
    );
    Ok(sources)
}
