use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// CLI arguments for the shapecheck binary.
#[derive(Parser, Debug)]
#[command(
    name = "shapecheck",
    version,
    about = "Report object fields observed with inconsistent types in runtime type traces"
)]
pub struct CliArgs {
    /// Tracer snapshot files (JSON) to analyse; each is an independent run.
    #[arg(required = true, value_name = "SNAPSHOT")]
    pub snapshots: Vec<PathBuf>,

    /// Configuration file. Defaults to `shapecheck.json` in the working directory, if present.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // ==================== Output ====================
    /// Report format.
    #[arg(short = 'f', long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Colorize text output.
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// Write Graphviz files (`types.dot`, `warning<id>.dot`) into this directory.
    #[arg(long, value_name = "DIR")]
    pub dot: Option<PathBuf>,

    // ==================== Analysis ====================
    /// Skip type diffs for warnings with more observed types than this.
    #[arg(long = "max-types-for-type-diff")]
    pub max_types_for_type_diff: Option<usize>,

    /// Node budget of a canonical representation before a type counts as too complex.
    #[arg(long = "max-nodes")]
    pub max_nodes_in_canonical_repr: Option<usize>,

    /// Work-item budget for expanding one type into access paths.
    #[arg(long = "max-diff-work-items")]
    pub max_type_diff_work_items: Option<usize>,

    /// Report warnings even when the snapshot's beliefs explain them.
    #[arg(long = "no-beliefs")]
    pub no_beliefs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}
