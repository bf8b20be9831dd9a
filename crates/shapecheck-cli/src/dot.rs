//! Graphviz rendering of analysed types.
//!
//! One node per equivalence-class root, labelled with its name and origin,
//! and one edge per (field, observed root). Highlighted types are filled.

use rustc_hash::FxHashSet;
use shapecheck_solver::{TypeDescription, TypeGraph, TypeId, VisualizationSink};
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes every received graph as `<dir>/<name>`.
pub struct DotWriter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DotWriter {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl VisualizationSink for DotWriter {
    type Error = io::Error;

    fn visualize(&mut self, graph: &TypeGraph<'_>, name: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, render_dot(graph))?;
        debug!(path = %path.display(), "wrote type graph");
        self.written.push(path);
        Ok(())
    }
}

/// Render `graph` in the DOT language.
///
/// A focused graph only contains the highlighted types and the types their
/// fields point to.
pub fn render_dot(graph: &TypeGraph<'_>) -> String {
    let table = graph.table;
    let equivalence = graph.equivalence;

    let sources: Vec<TypeId> = equivalence
        .roots()
        .iter()
        .copied()
        .filter(|root| !graph.focused || graph.highlighted.contains(root))
        .collect();

    let mut edges = Vec::new();
    let mut nodes: Vec<TypeId> = sources.clone();
    let mut seen: FxHashSet<TypeId> = sources.iter().copied().collect();
    for &source in &sources {
        let Some(shape) = table.shape(source) else {
            continue;
        };
        for (field, types) in shape.iter() {
            let mut targets: Vec<TypeId> = types.types().map(|ty| equivalence.find(ty)).collect();
            targets.sort_unstable();
            targets.dedup();
            for target in targets {
                if seen.insert(target) {
                    nodes.push(target);
                }
                edges.push((source, field, target));
            }
        }
    }

    let mut out = String::from("digraph types {\n    node [shape=box, fontname=\"monospace\"];\n");
    for ty in nodes {
        let description = TypeDescription::of(table, ty);
        let label = format!(
            "{}\\n{}",
            escape(table.resolve(ty)),
            escape(&description.display(graph.locations).to_string())
        );
        let _ = write!(out, "    {} [label=\"{label}\"", node_id(ty));
        if ty.is_primitive() {
            out.push_str(", shape=ellipse");
        }
        if graph.highlighted.contains(&ty) {
            out.push_str(", style=filled, fillcolor=gold");
        }
        out.push_str("];\n");
    }
    for (source, field, target) in edges {
        let _ = writeln!(
            out,
            "    {} -> {} [label=\"{}\"];",
            node_id(source),
            node_id(target),
            escape(field)
        );
    }
    out.push_str("}\n");
    out
}

fn node_id(ty: TypeId) -> String {
    format!("t{}", ty.0)
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
