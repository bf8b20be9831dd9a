use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use shapecheck_common::{LocationId, LocationResolver};
use shapecheck_solver::{TypeDescription, TypeDiff, TypeTable, Warning};
use std::collections::BTreeMap;
use std::path::Path;

use crate::args::OutputFormat;
use crate::driver::SnapshotRun;

pub struct Reporter {
    format: OutputFormat,
    color: bool,
}

impl Reporter {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Reporter { format, color }
    }

    /// Render the reports of all runs, in the given order.
    pub fn render(&self, runs: &[SnapshotRun]) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.render_text(runs)),
            OutputFormat::Json => {
                let reports: Vec<JsonReport<'_>> = runs.iter().map(JsonReport::new).collect();
                serde_json::to_string_pretty(&reports).context("failed to serialize report")
            }
        }
    }

    fn render_text(&self, runs: &[SnapshotRun]) -> String {
        let mut out = String::new();
        for (index, run) in runs.iter().enumerate() {
            if runs.len() > 1 {
                if index > 0 {
                    out.push('\n');
                }
                out.push_str(&self.format_header(&run.path));
                out.push('\n');
            }
            for warning in &run.report.warnings {
                out.push_str(&self.format_warning(warning, &run.report.table, &run.locations));
                out.push('\n');
            }
            out.push_str(&self.format_summary(run));
            out.push('\n');
        }
        out
    }

    fn format_header(&self, path: &Path) -> String {
        let header = format!("==> {} <==", path.display());
        if self.color {
            header.bold().to_string()
        } else {
            header
        }
    }

    pub fn format_warning(
        &self,
        warning: &Warning,
        table: &TypeTable,
        locations: &dyn LocationResolver,
    ) -> String {
        let text = warning.display(table, locations).to_string();
        if !self.color {
            return text;
        }
        // Highlight the `Warning <id>:` label of the first line.
        match text.split_once(": ") {
            Some((label, rest)) => format!("{}: {rest}", label.yellow().bold()),
            None => text,
        }
    }

    fn format_summary(&self, run: &SnapshotRun) -> String {
        let count = run.report.warnings.len();
        let mut summary = match count {
            0 => "No type inconsistencies found".to_string(),
            1 => "Found 1 warning".to_string(),
            n => format!("Found {n} warnings"),
        };
        if run.report.suppressed > 0 {
            summary.push_str(&format!(
                " ({} suppressed by beliefs)",
                run.report.suppressed
            ));
        }
        summary.push('.');

        if !self.color {
            return summary;
        }
        if count == 0 {
            summary.green().to_string()
        } else {
            summary.yellow().to_string()
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    snapshot: String,
    warnings: Vec<JsonWarning<'a>>,
    suppressed_by_belief: usize,
    equivalence_classes: usize,
}

impl<'a> JsonReport<'a> {
    fn new(run: &'a SnapshotRun) -> Self {
        let table = &run.report.table;
        let locations = &run.locations;
        JsonReport {
            snapshot: run.path.display().to_string(),
            warnings: run
                .report
                .warnings
                .iter()
                .map(|warning| JsonWarning::new(warning, table, locations))
                .collect(),
            suppressed_by_belief: run.report.suppressed,
            equivalence_classes: run.report.equivalence.roots().len(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum JsonWarning<'a> {
    InconsistentType {
        id: u32,
        type_name: &'a str,
        type_description: String,
        field: &'a str,
        observed: Vec<JsonObservedType<'a>>,
        type_diff: Option<JsonTypeDiff<'a>>,
    },
    UndefinedField {
        id: u32,
        type_name: &'a str,
        type_description: String,
        locations: Vec<String>,
    },
}

impl<'a> JsonWarning<'a> {
    fn new(warning: &'a Warning, table: &'a TypeTable, locations: &dyn LocationResolver) -> Self {
        match warning {
            Warning::Inconsistent(warning) => JsonWarning::InconsistentType {
                id: warning.id.0,
                type_name: table.resolve(warning.owner.ty()),
                type_description: describe(&warning.owner, locations),
                field: &warning.field,
                observed: warning
                    .observed
                    .iter()
                    .map(|observed| JsonObservedType {
                        type_name: table.resolve(observed.description.ty()),
                        description: describe(&observed.description, locations),
                        locations: resolve_all(&observed.locations, locations),
                    })
                    .collect(),
                type_diff: warning
                    .type_diff
                    .as_ref()
                    .map(|diff| JsonTypeDiff::new(diff, table)),
            },
            Warning::UndefinedField(warning) => JsonWarning::UndefinedField {
                id: warning.id.0,
                type_name: table.resolve(warning.owner.ty()),
                type_description: describe(&warning.owner, locations),
                locations: resolve_all(&warning.locations, locations),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonObservedType<'a> {
    type_name: &'a str,
    description: String,
    locations: Vec<String>,
}

#[derive(Serialize)]
struct JsonTypeDiff<'a> {
    common: BTreeMap<&'a str, &'a str>,
    diff: BTreeMap<&'a str, Vec<&'a str>>,
}

impl<'a> JsonTypeDiff<'a> {
    fn new(diff: &'a TypeDiff, table: &'a TypeTable) -> Self {
        JsonTypeDiff {
            common: diff
                .common
                .iter()
                .map(|(path, ty)| (path.as_str(), table.resolve(*ty)))
                .collect(),
            diff: diff
                .diff
                .iter()
                .map(|(path, types)| {
                    let mut names: Vec<&str> = types.iter().map(|ty| table.resolve(*ty)).collect();
                    names.sort_unstable();
                    (path.as_str(), names)
                })
                .collect(),
        }
    }
}

fn describe(description: &TypeDescription, locations: &dyn LocationResolver) -> String {
    description.display(locations).to_string()
}

fn resolve_all(sites: &[LocationId], locations: &dyn LocationResolver) -> Vec<String> {
    sites
        .iter()
        .map(|site| locations.resolve(site).into_owned())
        .collect()
}
