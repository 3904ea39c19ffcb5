//! Build pipeline orchestration.
//!
//! A build runs in two phases. The render phase discovers sources, merges the
//! base tree, layers every theme and renders every target in memory. Only
//! when all of that succeeds does the write phase touch the output
//! directory, so a failing build leaves previous outputs as they were.

use crate::build::{
    discover_sources, BuildContext, BuildPlan, BuildResult, BuildStatus, DictionarySource,
    DiscoveryError, FileTarget, TargetResult, TokenSources,
};
use crate::css::{minify_stylesheet, validate_stylesheet, CssError};
use crate::dictionary::{Dictionary, DictionaryError};
use crate::format::{self, FormatArgs, FormatError, FormatOptions};
use crate::source::{SourceError, TokenTree};
use crate::theme::{build_theme, primary_index, ThemedDictionary};
use crate::transform::{TransformChain, TransformError, TransformOptions};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error during build execution.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Discovery error
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// Token file could not be loaded or merged
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Dictionary could not be built
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    /// Configured transform is unknown
    #[error(transparent)]
    Transform(#[from] TransformError),
    /// `[themes] primary` names a theme that has no file
    #[error("Primary theme '{name}' not found (available: {})", .available.join(", "))]
    UnknownPrimaryTheme { name: String, available: Vec<String> },
    /// A target failed to render
    #[error("{target}: {source}")]
    Format {
        target: String,
        #[source]
        source: FormatError,
    },
    /// Generated CSS failed validation or minification
    #[error(transparent)]
    Css(#[from] CssError),
    /// Output could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Merged base tree plus one extended dictionary per theme.
#[derive(Debug)]
pub struct LoadedTokens {
    /// Files the tokens were loaded from
    pub sources: TokenSources,
    /// Base and component tokens merged
    pub base: TokenTree,
    /// Dictionary of the base tree
    pub base_dictionary: Dictionary,
    /// Extended dictionaries, in theme order
    pub themes: Vec<ThemedDictionary>,
    /// Index of the primary theme in `themes`
    pub primary: usize,
    /// Collisions reported outside strict mode
    pub warnings: Vec<String>,
}

impl LoadedTokens {
    /// Extended dictionary of a theme by name.
    pub fn theme(&self, name: &str) -> Option<&ThemedDictionary> {
        self.themes.iter().find(|t| t.theme.name == name)
    }

    /// The theme representing `vars.css`.
    pub fn primary(&self) -> &ThemedDictionary {
        &self.themes[self.primary]
    }
}

/// A stylesheet rendered in memory, not yet written.
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub target_id: String,
    pub path: PathBuf,
    pub contents: String,
    pub token_count: usize,
    pub duration: Duration,
}

/// Build pipeline for executing builds.
pub struct BuildPipeline {
    context: BuildContext,
}

impl BuildPipeline {
    /// Create a new build pipeline.
    pub fn new(context: BuildContext) -> Self {
        Self { context }
    }

    /// Get the build context.
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Run the build: render everything, then write.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let tokens = self.load()?;
        let plan = self.plan(&tokens);
        let rendered = self.render(&plan, &tokens)?;

        let mut result = BuildResult::new();
        for warning in tokens.warnings {
            result.add_warning(warning);
        }

        if !self.context.is_dry_run() {
            let out_dir = self.context.out_dir();
            fs::create_dir_all(&out_dir)
                .map_err(|source| BuildError::Io { path: out_dir.clone(), source })?;
        }

        for file in rendered {
            result.add_result(self.write(file)?);
        }

        Ok(result.with_duration(start.elapsed()))
    }

    /// Discover sources, merge the base tree and layer every theme.
    pub fn load(&self) -> Result<LoadedTokens, BuildError> {
        let config = self.context.config();
        let sources = discover_sources(&self.context)?;

        let transforms = TransformChain::from_names(
            &config.css.transforms,
            TransformOptions { prefix: config.prefix().map(str::to_string) },
        )?;

        let mut warnings = Vec::new();
        let mut base = TokenTree::new();
        for file in sources.shared_files() {
            debug!(file = %file.display(), "merging token file");
            for path in base.merge_file(file)? {
                if self.context.is_strict() {
                    return Err(SourceError::Collision { path, file: file.clone() }.into());
                }
                warn!(token = %path, file = %file.display(), "token collision");
                warnings.push(format!("Token '{}' redefined by {}", path, file.display()));
            }
        }

        let base_dictionary = Dictionary::from_tree(&base, &transforms)?;

        let mut themes = Vec::with_capacity(sources.themes.len());
        for theme in &sources.themes {
            themes.push(build_theme(&base, theme, &transforms)?);
        }

        let primary_name = config.themes.primary.as_deref();
        let primary = primary_index(&sources.themes, primary_name).ok_or_else(|| {
            BuildError::UnknownPrimaryTheme {
                name: primary_name.unwrap_or_default().to_string(),
                available: sources.themes.iter().map(|t| t.name.clone()).collect(),
            }
        })?;

        info!(
            tokens = base_dictionary.len(),
            themes = themes.len(),
            primary = %themes[primary].theme.name,
            "loaded token dictionaries"
        );

        Ok(LoadedTokens { sources, base, base_dictionary, themes, primary, warnings })
    }

    /// Build plan for a loaded token set.
    pub fn plan(&self, tokens: &LoadedTokens) -> BuildPlan {
        let themes: Vec<_> = tokens.themes.iter().map(|t| t.theme.clone()).collect();
        BuildPlan::standard(&themes, &tokens.primary().theme)
    }

    /// Render every target of the plan in memory.
    pub fn render(
        &self,
        plan: &BuildPlan,
        tokens: &LoadedTokens,
    ) -> Result<Vec<RenderedFile>, BuildError> {
        let options = self.context.config().format_options();
        plan.targets().iter().map(|target| self.render_target(target, tokens, &options)).collect()
    }

    fn render_target(
        &self,
        target: &FileTarget,
        tokens: &LoadedTokens,
        options: &FormatOptions,
    ) -> Result<RenderedFile, BuildError> {
        let start = Instant::now();
        let css_config = &self.context.config().css;
        let format_error =
            |source: FormatError| BuildError::Format { target: target.file_name.clone(), source };

        let dictionary = match &target.source {
            DictionarySource::Base => &tokens.base_dictionary,
            DictionarySource::Theme(name) => match tokens.theme(name) {
                Some(themed) => &themed.dictionary,
                None => {
                    return Err(BuildError::UnknownPrimaryTheme {
                        name: name.clone(),
                        available: tokens.themes.iter().map(|t| t.theme.name.clone()).collect(),
                    })
                }
            },
        };

        let selected = dictionary.filter(|t| target.filter.matches(t));
        let options = FormatOptions { output_references: target.output_references, ..options.clone() };
        let format = format::builtin(target.format).map_err(format_error)?;
        let args = FormatArgs { dictionary, tokens: &selected, options: &options };

        let mut contents = format.format(&args).map_err(format_error)?;

        if css_config.validate_output {
            validate_stylesheet(&target.file_name, &contents)?;
        }
        if css_config.minify && !contents.is_empty() {
            contents = minify_stylesheet(&target.file_name, &contents)?;
        }

        debug!(
            target = %target.id,
            format = target.format,
            tokens = selected.len(),
            bytes = contents.len(),
            "rendered target"
        );

        Ok(RenderedFile {
            target_id: target.id.clone(),
            path: self.context.out_dir().join(&target.file_name),
            contents,
            token_count: selected.len(),
            duration: start.elapsed(),
        })
    }

    /// Write one rendered file unless its content is already on disk.
    fn write(&self, file: RenderedFile) -> Result<TargetResult, BuildError> {
        let status = if self.context.is_dry_run() {
            BuildStatus::Planned
        } else if fs::read(&file.path).is_ok_and(|existing| existing == file.contents.as_bytes()) {
            debug!(file = %file.path.display(), "output unchanged");
            BuildStatus::Unchanged
        } else {
            fs::write(&file.path, &file.contents)
                .map_err(|source| BuildError::Io { path: file.path.clone(), source })?;
            info!(file = %file.path.display(), "wrote stylesheet");
            BuildStatus::Written
        };

        Ok(TargetResult::new(file.target_id, file.path, status).with_render_stats(
            file.token_count,
            file.contents.len(),
            file.duration,
        ))
    }
}
