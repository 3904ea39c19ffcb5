//! Build result types.
//!
//! Contains types for representing the outcome of build operations.

use std::path::PathBuf;
use std::time::Duration;

/// Status of a single output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// File was written
    Written,
    /// Existing file already had identical content
    Unchanged,
    /// Rendered only (dry run)
    Planned,
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Written => write!(f, "written"),
            BuildStatus::Unchanged => write!(f, "unchanged"),
            BuildStatus::Planned => write!(f, "planned"),
        }
    }
}

/// Result of building a single target.
#[derive(Debug, Clone)]
pub struct TargetResult {
    /// Target ID that was built
    pub target_id: String,
    /// Output file
    pub output: PathBuf,
    /// Build status
    pub status: BuildStatus,
    /// Number of tokens rendered
    pub token_count: usize,
    /// Size of the rendered stylesheet in bytes
    pub bytes: usize,
    /// Render duration
    pub duration: Duration,
}

impl TargetResult {
    pub fn new(target_id: String, output: PathBuf, status: BuildStatus) -> Self {
        Self { target_id, output, status, token_count: 0, bytes: 0, duration: Duration::ZERO }
    }

    /// Record what was rendered.
    pub fn with_render_stats(mut self, token_count: usize, bytes: usize, duration: Duration) -> Self {
        self.token_count = token_count;
        self.bytes = bytes;
        self.duration = duration;
        self
    }
}

/// Result of a complete build run.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Results for each target, in plan order
    pub targets: Vec<TargetResult>,
    /// Non-fatal problems (e.g. token collisions outside strict mode)
    pub warnings: Vec<String>,
    /// Total build duration
    pub total_duration: Duration,
}

impl BuildResult {
    /// Create a new empty build result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target result.
    pub fn add_result(&mut self, result: TargetResult) {
        self.targets.push(result);
    }

    /// Add a warning.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    fn count(&self, status: BuildStatus) -> usize {
        self.targets.iter().filter(|r| r.status == status).count()
    }

    /// Get the number of written files.
    pub fn written_count(&self) -> usize {
        self.count(BuildStatus::Written)
    }

    /// Get the number of files left untouched.
    pub fn unchanged_count(&self) -> usize {
        self.count(BuildStatus::Unchanged)
    }

    /// Get the number of files rendered in a dry run.
    pub fn planned_count(&self) -> usize {
        self.count(BuildStatus::Planned)
    }

    /// Get all output paths.
    pub fn all_outputs(&self) -> Vec<&PathBuf> {
        self.targets.iter().map(|r| &r.output).collect()
    }

    /// Format a summary of the build result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        let total = self.targets.len();

        let planned = self.planned_count();
        if planned > 0 {
            lines.push(format!("Dry run: {} files rendered, nothing written", planned));
            for target in &self.targets {
                lines.push(format!(
                    "  - {} ({} tokens, {} bytes)",
                    target.output.display(),
                    target.token_count,
                    target.bytes
                ));
            }
        } else {
            lines.push(format!(
                "Build succeeded: {} written, {} unchanged ({} total) in {:?}",
                self.written_count(),
                self.unchanged_count(),
                total,
                self.total_duration
            ));
        }

        if !self.warnings.is_empty() {
            lines.push(format!("Warnings ({}): ", self.warnings.len()));
            for warning in self.warnings.iter().take(5) {
                lines.push(format!("  - {}", warning));
            }
            if self.warnings.len() > 5 {
                lines.push(format!("  ... and {} more", self.warnings.len() - 5));
            }
        }

        lines.join("\n")
    }
}
