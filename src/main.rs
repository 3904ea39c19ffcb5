//! tokensmith - Command-line tool for compiling design tokens into CSS

use std::process::ExitCode;

use tokensmith::cli;

fn main() -> ExitCode {
    cli::run()
}
