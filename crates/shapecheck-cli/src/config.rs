use anyhow::{Context, Result, bail};
use serde::Deserialize;
use shapecheck_solver::AnalysisOptions;
use std::path::{Path, PathBuf};

use crate::args::{CliArgs, ColorChoice, OutputFormat};

pub const DEFAULT_CONFIG_FILE: &str = "shapecheck.json";

/// Contents of a `shapecheck.json` file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub analysis: AnalysisOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub color: Option<bool>,
}

/// Settings of one invocation after merging the config file with the flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub analysis: AnalysisOptions,
    pub format: OutputFormat,
    pub color: bool,
    pub dot_dir: Option<PathBuf>,
}

pub fn parse_config(source: &str) -> Result<ConfigFile> {
    serde_json::from_str(source).context("invalid shapecheck configuration")
}

/// Load the configuration named on the command line, or the default file
/// in `cwd` when it exists.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => {
            let path = cwd.join(path);
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            path
        }
        None => {
            let path = cwd.join(DEFAULT_CONFIG_FILE);
            if !path.is_file() {
                return Ok(ConfigFile::default());
            }
            path
        }
    };

    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&source).with_context(|| format!("in {}", path.display()))
}

/// Command line flags win over the file; color falls back to terminal detection.
pub fn resolve_config(
    args: &CliArgs,
    file: ConfigFile,
    cwd: &Path,
    stdout_is_terminal: bool,
) -> ResolvedConfig {
    let mut analysis = file.analysis;
    if let Some(max) = args.max_types_for_type_diff {
        analysis.max_types_for_type_diff = max;
    }
    if let Some(max) = args.max_nodes_in_canonical_repr {
        analysis.max_nodes_in_canonical_repr = max;
    }
    if let Some(max) = args.max_type_diff_work_items {
        analysis.max_type_diff_work_items = max;
    }
    if args.no_beliefs {
        analysis.apply_beliefs = false;
    }

    let format = args
        .format
        .or(file.output.format)
        .unwrap_or(OutputFormat::Text);
    let color = match args.color {
        Some(ColorChoice::Always) => true,
        Some(ColorChoice::Never) => false,
        Some(ColorChoice::Auto) => stdout_is_terminal,
        None => file.output.color.unwrap_or(stdout_is_terminal),
    };

    ResolvedConfig {
        analysis,
        format,
        color: color && format == OutputFormat::Text,
        dot_dir: args.dot.as_ref().map(|dir| cwd.join(dir)),
    }
}
