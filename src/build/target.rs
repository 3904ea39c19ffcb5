//! Build target definitions.
//!
//! A build target is one stylesheet written by the pipeline: which
//! dictionary feeds it, which tokens it selects, and which format renders it.

use crate::theme::ThemeSource;
use crate::token::Token;
use std::path::PathBuf;

/// Font face stylesheet file name.
pub const FONTS_FILE: &str = "fonts.css";
/// Reference-preserving variables file name.
pub const VARIABLES_FILE: &str = "vars.css";

/// Type of build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// `@font-face` rules
    FontFaces,
    /// Per-theme light/dark variables
    Theme,
    /// Flattened variables using the primary theme
    Variables,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::FontFaces => write!(f, "fonts"),
            TargetKind::Theme => write!(f, "theme"),
            TargetKind::Variables => write!(f, "vars"),
        }
    }
}

/// Which tokens of a dictionary a target includes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenFilter {
    /// `asset.font.*` tokens of type `font`
    FontAssets,
    /// Everything but font assets; other assets only when the theme file
    /// itself defines them
    Theme { theme_file: PathBuf },
    /// Everything but font assets
    NonFont,
}

impl TokenFilter {
    pub fn matches(&self, token: &Token) -> bool {
        match self {
            TokenFilter::FontAssets => token.is_font_asset(),
            TokenFilter::Theme { theme_file } => {
                if token.is_font_asset() {
                    return false;
                }
                !token.is_asset() || token.file_path.as_deref() == Some(theme_file.as_path())
            }
            TokenFilter::NonFont => !token.is_font_asset(),
        }
    }
}

/// Which dictionary a target renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    /// Shared base and component tokens only
    Base,
    /// The extended dictionary of the named theme
    Theme(String),
}

/// One output file of the build.
#[derive(Debug, Clone)]
pub struct FileTarget {
    /// Unique identifier (e.g., "theme:dark")
    pub id: String,
    /// What kind of target this is
    pub kind: TargetKind,
    /// Output file name relative to the output directory
    pub file_name: String,
    /// Registered format name
    pub format: &'static str,
    /// Token selection
    pub filter: TokenFilter,
    /// Dictionary feeding this target
    pub source: DictionarySource,
    /// Rewrite references to `var(--name)` instead of resolving them
    pub output_references: bool,
}

impl FileTarget {
    /// `fonts.css` from the base dictionary.
    pub fn fonts() -> Self {
        Self {
            id: "fonts".to_string(),
            kind: TargetKind::FontFaces,
            file_name: FONTS_FILE.to_string(),
            format: "css/font-face",
            filter: TokenFilter::FontAssets,
            source: DictionarySource::Base,
            output_references: false,
        }
    }

    /// `<theme>.css` from the theme's extended dictionary.
    pub fn theme(theme: &ThemeSource) -> Self {
        Self {
            id: format!("theme:{}", theme.name),
            kind: TargetKind::Theme,
            file_name: theme.css_file_name(),
            format: "css/dark-mode-variables",
            filter: TokenFilter::Theme { theme_file: theme.path.clone() },
            source: DictionarySource::Theme(theme.name.clone()),
            output_references: false,
        }
    }

    /// `vars.css` from the primary theme's dictionary.
    pub fn variables(primary: &ThemeSource) -> Self {
        Self {
            id: "vars".to_string(),
            kind: TargetKind::Variables,
            file_name: VARIABLES_FILE.to_string(),
            format: "css/variables",
            filter: TokenFilter::NonFont,
            source: DictionarySource::Theme(primary.name.clone()),
            output_references: true,
        }
    }
}

/// The ordered list of files a build produces.
#[derive(Debug, Default)]
pub struct BuildPlan {
    targets: Vec<FileTarget>,
}

impl BuildPlan {
    /// Create a new empty build plan.
    pub fn new() -> Self {
        Self { targets: vec![] }
    }

    /// Standard plan: fonts, one file per theme, then the variables file.
    pub fn standard(themes: &[ThemeSource], primary: &ThemeSource) -> Self {
        let mut plan = Self::new();
        plan.add_target(FileTarget::fonts());
        for theme in themes {
            plan.add_target(FileTarget::theme(theme));
        }
        plan.add_target(FileTarget::variables(primary));
        plan
    }

    /// Add a target to the plan.
    pub fn add_target(&mut self, target: FileTarget) {
        self.targets.push(target);
    }

    /// Get all targets in the plan.
    pub fn targets(&self) -> &[FileTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
