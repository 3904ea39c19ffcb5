//! Build command implementations (build, init)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::build::{BuildContext, BuildPipeline};
use crate::config::loader::{
    default_config, find_config, load_config, merge_cli_overrides, CliOverrides,
};
use crate::config::TokensConfig;

/// Flags of the build command.
#[derive(Debug, Default)]
pub struct BuildArgs {
    pub src: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub strict: bool,
    pub minify: bool,
    pub dry_run: bool,
    pub watch: bool,
    pub verbose: bool,
}

/// Load tokens.toml (or defaults) and the project root it implies.
pub(crate) fn load_project(verbose: bool) -> Result<(TokensConfig, PathBuf), ExitCode> {
    match find_config() {
        Some(config_path) => {
            if verbose {
                println!("Using config: {}", config_path.display());
            }
            let cfg = load_config(Some(&config_path)).map_err(|e| {
                eprintln!("Error loading config: {}", e);
                ExitCode::from(EXIT_ERROR)
            })?;
            let root = config_path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
            Ok((cfg, root))
        }
        None => {
            if verbose {
                println!("No tokens.toml found, using defaults");
            }
            let root = std::env::current_dir().unwrap_or_default();
            Ok((default_config(), root))
        }
    }
}

/// Run the build command
pub fn run_build(args: &BuildArgs) -> ExitCode {
    let (mut config, project_root) = match load_project(args.verbose) {
        Ok(project) => project,
        Err(code) => return code,
    };

    let overrides = CliOverrides {
        out: args.out.clone(),
        src: args.src.clone(),
        strict: args.strict.then_some(true),
        minify: args.minify.then_some(true),
    };
    merge_cli_overrides(&mut config, &overrides);

    let watch_config = config.watch.clone();
    let context = BuildContext::new(config, project_root)
        .with_verbose(args.verbose)
        .with_dry_run(args.dry_run);

    if args.watch {
        let options =
            crate::watch::WatchOptions { src_dir: context.src_dir(), config: watch_config };
        let pipeline = BuildPipeline::new(context);

        println!("Starting watch mode...");
        println!("Press Ctrl+C to stop");
        println!();

        return match crate::watch::watch_and_rebuild(options, || pipeline.build()) {
            Ok(()) => ExitCode::from(EXIT_SUCCESS),
            Err(e) => {
                eprintln!("Watch error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    match BuildPipeline::new(context).build() {
        Ok(result) => {
            println!("{}", result.summary());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the init command
pub fn run_init(path: Option<&Path>, name: Option<&str>) -> ExitCode {
    use crate::init::{init_project, InitError};

    let project_path = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    let project_name = name
        .map(|n| n.to_string())
        .or_else(|| project_path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "design-tokens".to_string());

    match init_project(&project_path, &project_name) {
        Ok(()) => {
            println!("Created token project '{}' at {}", project_name, project_path.display());
            println!();
            println!("Project structure:");
            println!("  {}/", project_path.display());
            println!("  ├── tokens.toml");
            println!("  └── tokens/");
            println!("      ├── base/        color.json, size.json, font.json");
            println!("      ├── components/  button.json");
            println!("      └── themes/      light.json, dark.json");
            println!();
            println!("Next steps:");
            println!("  cd {}", project_path.display());
            println!("  tokensmith build");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(InitError::DirectoryExists(dir)) => {
            eprintln!("Error: Directory '{}' already exists and is not empty", dir);
            eprintln!("Use an empty directory or specify a different path");
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
