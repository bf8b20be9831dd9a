use anyhow::{Context, Result};
use rayon::prelude::*;
use shapecheck_common::LocationMap;
use shapecheck_solver::{AnalysisOptions, AnalysisReport, EngineSnapshot, KeepAll, analyze_snapshot};
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

use crate::args::CliArgs;
use crate::config::{ResolvedConfig, load_config, resolve_config};
use crate::dot::DotWriter;
use crate::reporter::Reporter;

/// Analysis result of one snapshot file.
#[derive(Debug)]
pub struct SnapshotRun {
    pub path: PathBuf,
    pub report: AnalysisReport,
    pub locations: LocationMap,
}

/// What the binary prints and how it exits.
#[derive(Debug)]
pub struct Outcome {
    pub output: String,
    pub warnings: usize,
    pub dot_files: Vec<PathBuf>,
}

pub fn load_snapshot(path: &Path) -> Result<EngineSnapshot> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    EngineSnapshot::from_json(&source)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))
}

pub fn analyze_file(path: &Path, options: &AnalysisOptions) -> Result<SnapshotRun> {
    let _span = info_span!("snapshot", path = %path.display()).entered();
    let snapshot = load_snapshot(path)?;
    let report = analyze_snapshot(&snapshot, options, &KeepAll)
        .with_context(|| format!("malformed type table in {}", path.display()))?;
    debug!(
        warnings = report.warnings.len(),
        suppressed = report.suppressed,
        "analysed snapshot"
    );
    Ok(SnapshotRun {
        path: path.to_path_buf(),
        report,
        locations: snapshot.locations(),
    })
}

/// Analyse every snapshot as an independent run, in parallel. Results keep
/// the order of `paths`.
pub fn analyze_files(paths: &[PathBuf], options: &AnalysisOptions) -> Result<Vec<SnapshotRun>> {
    paths
        .par_iter()
        .map(|path| analyze_file(path, options))
        .collect()
}

/// Write the DOT files of each run. Several runs get one subdirectory each,
/// named after the snapshot file.
fn write_dot_files(runs: &[SnapshotRun], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (index, run) in runs.iter().enumerate() {
        let target = if runs.len() == 1 {
            dir.to_path_buf()
        } else {
            let stem = run
                .path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("snapshot{index}"));
            dir.join(stem)
        };
        let mut writer = DotWriter::new(target);
        run.report
            .visualize(&mut writer, &run.locations, true, true)
            .with_context(|| format!("failed to write DOT files to {}", writer.dir().display()))?;
        written.extend_from_slice(writer.written());
    }
    Ok(written)
}

pub fn run_with_config(args: &CliArgs, config: &ResolvedConfig, cwd: &Path) -> Result<Outcome> {
    let paths: Vec<PathBuf> = args.snapshots.iter().map(|path| cwd.join(path)).collect();
    let runs = analyze_files(&paths, &config.analysis)?;

    let dot_files = match &config.dot_dir {
        Some(dir) => write_dot_files(&runs, dir)?,
        None => Vec::new(),
    };
    let output = Reporter::new(config.format, config.color).render(&runs)?;
    let warnings = runs.iter().map(|run| run.report.warnings.len()).sum();

    Ok(Outcome {
        output,
        warnings,
        dot_files,
    })
}

/// Load configuration, analyse all snapshots and render the report.
pub fn run(args: &CliArgs, cwd: &Path, stdout_is_terminal: bool) -> Result<Outcome> {
    let file = load_config(args.config.as_deref(), cwd)?;
    let config = resolve_config(args, file, cwd, stdout_is_terminal);
    debug!(?config, "resolved configuration");
    run_with_config(args, &config, cwd)
}
