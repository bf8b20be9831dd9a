use clap::Parser;
use std::path::PathBuf;

use crate::args::{CliArgs, ColorChoice, OutputFormat};

#[test]
fn parses_snapshot_list_with_defaults() {
    let args = CliArgs::try_parse_from(["shapecheck", "a.json", "b.json"])
        .expect("snapshot paths should parse");

    assert_eq!(
        args.snapshots,
        vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
    );
    assert!(args.config.is_none());
    assert_eq!(args.format, None);
    assert_eq!(args.color, None);
    assert!(args.dot.is_none());
    assert_eq!(args.max_types_for_type_diff, None);
    assert!(!args.no_beliefs);
}

#[test]
fn requires_at_least_one_snapshot() {
    assert!(CliArgs::try_parse_from(["shapecheck"]).is_err());
}

#[test]
fn parses_analysis_and_output_flags() {
    let args = CliArgs::try_parse_from([
        "shapecheck",
        "--format",
        "JSON",
        "--color",
        "never",
        "--dot",
        "graphs",
        "--max-types-for-type-diff",
        "3",
        "--max-nodes",
        "20",
        "--max-diff-work-items",
        "1000",
        "--no-beliefs",
        "-c",
        "custom.json",
        "trace.json",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.format, Some(OutputFormat::Json));
    assert_eq!(args.color, Some(ColorChoice::Never));
    assert_eq!(args.dot, Some(PathBuf::from("graphs")));
    assert_eq!(args.max_types_for_type_diff, Some(3));
    assert_eq!(args.max_nodes_in_canonical_repr, Some(20));
    assert_eq!(args.max_type_diff_work_items, Some(1000));
    assert!(args.no_beliefs);
    assert_eq!(args.config, Some(PathBuf::from("custom.json")));
    assert_eq!(args.snapshots, vec![PathBuf::from("trace.json")]);
}

#[test]
fn rejects_non_numeric_limits() {
    let result = CliArgs::try_parse_from(["shapecheck", "--max-nodes", "many", "trace.json"]);
    assert!(result.is_err());
}
