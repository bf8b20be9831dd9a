//! Tracing setup for the `shapecheck` binary.
//!
//! `SHAPECHECK_LOG_FORMAT` picks the output:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span hierarchy via `tracing-tree`
//! - `json`: one JSON object per event
//!
//! ```bash
//! SHAPECHECK_LOG=debug shapecheck trace.json
//! SHAPECHECK_LOG="shapecheck_solver::equivalence=trace" SHAPECHECK_LOG_FORMAT=tree shapecheck trace.json
//! ```
//!
//! Nothing is installed unless `SHAPECHECK_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("SHAPECHECK_LOG_FORMAT").unwrap_or_default())
    }
}

/// `SHAPECHECK_LOG` takes precedence over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("SHAPECHECK_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber. All output goes to stderr so reports on
/// stdout stay machine-readable.
pub fn init_tracing() {
    let has_own_log = std::env::var("SHAPECHECK_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_own_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
