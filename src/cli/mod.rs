//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;
mod list;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TOKENSMITH_LOG";

/// tokensmith - Compile design tokens into CSS custom properties
#[derive(Parser)]
#[command(name = "tokensmith")]
#[command(about = "tokensmith - Compile JSON design tokens into CSS (fonts, themes, variables)")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build fonts.css, one stylesheet per theme, and vars.css
    Build {
        /// Token source directory (overrides tokens.toml)
        #[arg(long)]
        src: Option<PathBuf>,

        /// Output directory (overrides tokens.toml)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Treat token collisions between base files as errors
        #[arg(long)]
        strict: bool,

        /// Minify written stylesheets
        #[arg(long)]
        minify: bool,

        /// Render everything but write nothing
        #[arg(long)]
        dry_run: bool,

        /// Rebuild when token files change
        #[arg(short, long)]
        watch: bool,
    },
    /// Print resolved tokens
    List {
        /// Theme whose extended dictionary to list (default: base tokens)
        #[arg(long)]
        theme: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create tokens.toml and a starter token tree
    Init {
        /// Project directory (default: current directory)
        path: Option<PathBuf>,

        /// Project name (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },
}

/// Install the tracing subscriber.
///
/// `TOKENSMITH_LOG` takes precedence; otherwise the level follows `-v`.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .try_init();
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_INVALID_ARGS)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            };
        }
    };

    setup_logging(cli.verbose);
    let verbose = cli.verbose > 0;

    match cli.command {
        None => build::run_build(&build::BuildArgs { verbose, ..Default::default() }),
        Some(Commands::Build { src, out, strict, minify, dry_run, watch }) => {
            build::run_build(&build::BuildArgs { src, out, strict, minify, dry_run, watch, verbose })
        }
        Some(Commands::List { theme, json }) => list::run_list(theme.as_deref(), json),
        Some(Commands::Init { path, name }) => build::run_init(path.as_deref(), name.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_build() {
        let cli = Cli::try_parse_from(["tokensmith"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_build_flags() {
        let cli = Cli::try_parse_from([
            "tokensmith", "build", "--src", "design", "--out", "public", "--strict", "--minify",
            "--dry-run", "-v",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Some(Commands::Build { src, out, strict, minify, dry_run, watch }) => {
                assert_eq!(src, Some(PathBuf::from("design")));
                assert_eq!(out, Some(PathBuf::from("public")));
                assert!(strict && minify && dry_run);
                assert!(!watch);
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_list_flags() {
        let cli = Cli::try_parse_from(["tokensmith", "list", "--theme", "dark", "--json"]).unwrap();
        match cli.command {
            Some(Commands::List { theme, json }) => {
                assert_eq!(theme.as_deref(), Some("dark"));
                assert!(json);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["tokensmith", "build", "--force"]).is_err());
    }
}
