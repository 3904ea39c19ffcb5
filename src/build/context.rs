//! Build context containing configuration and state for a build.

use crate::config::TokensConfig;
use std::path::{Path, PathBuf};

/// Build context containing configuration and paths for a build operation.
///
/// The context provides access to all information needed to execute a build,
/// including the configuration, project root, and output directory.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: TokensConfig,
    /// Project root directory (where tokens.toml is located)
    project_root: PathBuf,
    /// Whether token collisions between base files are errors
    strict: bool,
    /// Whether to run in verbose mode
    verbose: bool,
    /// Render everything but write nothing
    dry_run: bool,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(config: TokensConfig, project_root: PathBuf) -> Self {
        let strict = config.validate.strict;
        Self { config, project_root, strict, verbose: false, dry_run: false }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TokensConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the token source directory (resolved to absolute path).
    pub fn src_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.src)
    }

    /// Get the output directory (resolved to absolute path).
    pub fn out_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.out)
    }

    /// Whether strict mode is enabled.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether this is a dry run.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Set strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Resolve a path relative to the project root.
    ///
    /// If the path is absolute, returns it unchanged.
    /// If relative, joins it with the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        crate::config::loader::resolve_path(&self.project_root, path)
    }
}
