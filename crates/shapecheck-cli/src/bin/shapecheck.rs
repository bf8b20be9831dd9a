#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use shapecheck_cli::args::CliArgs;
use shapecheck_cli::{driver, tracing_config};

const EXIT_SUCCESS: i32 = 0;
const EXIT_WARNINGS_REPORTED: i32 = 2;

fn main() -> Result<()> {
    // Only installs a subscriber when SHAPECHECK_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let outcome = driver::run(&args, &cwd, std::io::stdout().is_terminal())?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(outcome.output.as_bytes())
        .context("failed to write report")?;
    stdout.flush().context("failed to write report")?;
    for path in &outcome.dot_files {
        eprintln!("wrote {}", path.display());
    }

    std::process::exit(if outcome.warnings > 0 {
        EXIT_WARNINGS_REPORTED
    } else {
        EXIT_SUCCESS
    });
}
