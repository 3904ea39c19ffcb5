//! Theme extension
//!
//! A theme is one file under `themes/` layered on top of the shared base
//! tree. Every theme starts from its own clone of the base, so building one
//! theme never leaks values into another.

use crate::dictionary::{Dictionary, DictionaryError};
use crate::source::{SourceError, TokenTree};
use crate::transform::TransformChain;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A theme file and the name derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSource {
    /// Theme name (file stem)
    pub name: String,
    /// Path to the theme file
    pub path: PathBuf,
}

impl ThemeSource {
    /// Create a theme source from a file path, naming it after the file stem.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_stem()?.to_str()?.to_string();
        Some(Self { name, path: path.to_path_buf() })
    }

    /// Output file name (`<theme>.css`).
    pub fn css_file_name(&self) -> String {
        format!("{}.css", self.name)
    }
}

/// A theme's merged tree and the dictionary built from it.
#[derive(Debug, Clone)]
pub struct ThemedDictionary {
    pub theme: ThemeSource,
    pub tree: TokenTree,
    pub dictionary: Dictionary,
}

/// Layer a theme file onto a clone of `base`.
pub fn extend(base: &TokenTree, theme: &ThemeSource) -> Result<TokenTree, SourceError> {
    let mut tree = base.clone();
    let overridden = tree.merge_file(&theme.path)?;
    debug!(theme = %theme.name, overrides = overridden.len(), "layered theme onto base");
    Ok(tree)
}

/// Build the extended dictionary for one theme.
pub fn build_theme(
    base: &TokenTree,
    theme: &ThemeSource,
    transforms: &TransformChain,
) -> Result<ThemedDictionary, DictionaryError> {
    let tree = extend(base, theme)?;
    let dictionary = Dictionary::from_layered(&tree, Some(base), transforms)?;
    Ok(ThemedDictionary { theme: theme.clone(), tree, dictionary })
}

/// Index of the primary theme: the named one if given, else the first.
pub fn primary_index(themes: &[ThemeSource], primary: Option<&str>) -> Option<usize> {
    match primary {
        Some(name) => themes.iter().position(|t| t.name == name),
        None if themes.is_empty() => None,
        None => Some(0),
    }
}
