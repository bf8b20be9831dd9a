//! One complete analysis run.
//!
//! ```text
//! TypeTable ─▶ equivalence ─▶ warnings ─▶ beliefs (mark) ─▶ WarningFilter
//!                                      ─▶ beliefs (drop) ─▶ type diffs ─▶ AnalysisReport
//! ```

use serde::{Deserialize, Serialize};
use shapecheck_common::LocationResolver;
use shapecheck_common::limits::{
    MAX_NODES_IN_CANONICAL_REPR, MAX_TYPE_DIFF_WORK_ITEMS, MAX_TYPES_FOR_TYPE_DIFF,
};
use tracing::{debug, debug_span};

use crate::analyze::WarningGenerator;
use crate::beliefs::{Beliefs, retain_unsuppressed};
use crate::equivalence::{EquivalenceSolver, EquivalenceStats};
use crate::snapshot::EngineSnapshot;
use crate::table::{FxIndexSet, TableError, TypeTable};
use crate::type_diff::compute_diff;
use crate::types::TypeId;
use crate::union_find::EquivalenceTable;
use crate::warnings::{Warning, WarningIds};

/// Tunables of an analysis run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AnalysisOptions {
    /// Warnings with more observed types than this get no type diff.
    pub max_types_for_type_diff: usize,
    pub max_nodes_in_canonical_repr: usize,
    pub max_type_diff_work_items: usize,
    pub apply_beliefs: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            max_types_for_type_diff: MAX_TYPES_FOR_TYPE_DIFF,
            max_nodes_in_canonical_repr: MAX_NODES_IN_CANONICAL_REPR,
            max_type_diff_work_items: MAX_TYPE_DIFF_WORK_ITEMS,
            apply_beliefs: true,
        }
    }
}

/// Post-processing hook between belief marking and belief filtering,
/// e.g. dropping warnings unreachable from a program entry point.
pub trait WarningFilter {
    fn filter(&self, warnings: Vec<Warning>) -> Vec<Warning>;
}

/// Filter that keeps every warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepAll;

impl WarningFilter for KeepAll {
    fn filter(&self, warnings: Vec<Warning>) -> Vec<Warning> {
        warnings
    }
}

impl<F> WarningFilter for F
where
    F: Fn(&Warning) -> bool,
{
    fn filter(&self, warnings: Vec<Warning>) -> Vec<Warning> {
        warnings.into_iter().filter(|w| self(w)).collect()
    }
}

/// Everything a visualization needs to draw the analysed types.
pub struct TypeGraph<'a> {
    pub table: &'a TypeTable,
    pub equivalence: &'a EquivalenceTable,
    pub locations: &'a dyn LocationResolver,
    pub highlighted: &'a FxIndexSet<TypeId>,
    /// Restrict the drawing to the highlighted types and their neighbourhood.
    pub focused: bool,
}

/// Receives type graphs to render, e.g. as Graphviz files.
pub trait VisualizationSink {
    type Error;

    fn visualize(&mut self, graph: &TypeGraph<'_>, name: &str) -> Result<(), Self::Error>;
}

/// Result of one run: the inputs it was computed from and the surviving warnings.
#[derive(Debug)]
pub struct AnalysisReport {
    pub table: TypeTable,
    pub equivalence: EquivalenceTable,
    pub warnings: Vec<Warning>,
    pub stats: EquivalenceStats,
    /// Warnings removed by beliefs.
    pub suppressed: usize,
}

impl AnalysisReport {
    /// Union of the highlighted types of all warnings.
    pub fn highlighted(&self) -> FxIndexSet<TypeId> {
        self.warnings
            .iter()
            .flat_map(|warning| warning.highlighted().iter().copied())
            .collect()
    }

    /// Send `types.dot` (all types) and/or one `warning<id>.dot` per warning to `sink`.
    pub fn visualize<S: VisualizationSink>(
        &self,
        sink: &mut S,
        locations: &dyn LocationResolver,
        all_types: bool,
        per_warning: bool,
    ) -> Result<(), S::Error> {
        if all_types {
            let highlighted = self.highlighted();
            let graph = TypeGraph {
                table: &self.table,
                equivalence: &self.equivalence,
                locations,
                highlighted: &highlighted,
                focused: false,
            };
            sink.visualize(&graph, "types.dot")?;
        }
        if per_warning {
            for warning in &self.warnings {
                let graph = TypeGraph {
                    table: &self.table,
                    equivalence: &self.equivalence,
                    locations,
                    highlighted: warning.highlighted(),
                    focused: true,
                };
                sink.visualize(&graph, &format!("warning{}.dot", warning.id()))?;
            }
        }
        Ok(())
    }
}

/// Run the whole analysis over a frozen table.
pub fn analyze_types(
    table: TypeTable,
    beliefs: &Beliefs,
    options: &AnalysisOptions,
    filter: &dyn WarningFilter,
) -> AnalysisReport {
    let _span = debug_span!("analyze_types", types = table.len()).entered();

    let mut solver = EquivalenceSolver::with_max_nodes(&table, options.max_nodes_in_canonical_repr);
    let equivalence = solver.solve();
    let stats = solver.stats();

    let mut ids = WarningIds::new();
    let mut warnings = WarningGenerator::new(&table, &equivalence).generate(&mut ids);
    let generated = warnings.len();

    if options.apply_beliefs {
        beliefs.mark_suppressed(&mut warnings);
    }
    warnings = filter.filter(warnings);
    let before_beliefs = warnings.len();
    retain_unsuppressed(&mut warnings);
    let suppressed = before_beliefs - warnings.len();

    for warning in &mut warnings {
        let Warning::Inconsistent(warning) = warning else {
            continue;
        };
        if warning.observed.len() > options.max_types_for_type_diff {
            continue;
        }
        let observed: Vec<TypeId> = warning
            .observed
            .iter()
            .map(|observed| observed.description.ty())
            .collect();
        warning.type_diff = compute_diff(&table, &observed, options.max_type_diff_work_items);
    }

    debug!(
        generated,
        suppressed,
        reported = warnings.len(),
        "analysis finished"
    );
    AnalysisReport {
        table,
        equivalence,
        warnings,
        stats,
        suppressed,
    }
}

/// Decode, then analyse, one tracer snapshot.
pub fn analyze_snapshot(
    snapshot: &EngineSnapshot,
    options: &AnalysisOptions,
    filter: &dyn WarningFilter,
) -> Result<AnalysisReport, TableError> {
    let table = snapshot.to_table()?;
    let beliefs = if options.apply_beliefs {
        snapshot.beliefs(&table)
    } else {
        Beliefs::new()
    };
    Ok(analyze_types(table, &beliefs, options, filter))
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
