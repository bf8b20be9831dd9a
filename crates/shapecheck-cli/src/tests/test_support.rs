use shapecheck_solver::{AnalysisOptions, EngineSnapshot, KeepAll, analyze_snapshot};
use std::path::PathBuf;

use crate::driver::SnapshotRun;

/// Three points, two of them structurally equal; `frame(2)`'s conflict is believed.
pub const POINTS: &str = r#"{
    "typeNameToFieldTypes": {
        "object(10)": { "x": { "number": ["11"] }, "y": { "number": ["12"] } },
        "object(20)": { "x": { "number": ["21"] }, "y": { "number": ["22"] } },
        "object(30)": { "x": { "string": ["31"] }, "y": { "number": ["32"] } },
        "frame(1)": {
            "p": { "object(10)": ["40"], "object(20)": ["41"], "object(30)": ["42"] }
        },
        "frame(2)": {
            "q": { "object(10)": ["50"], "object(30)": ["51"] }
        }
    },
    "frameToBeliefs": {
        "frame(2)": { "q": ["object(30)"] }
    },
    "iidToLocation": {
        "1": "main.js:1:1",
        "10": "main.js:10:9",
        "30": "main.js:30:9",
        "40": "main.js:40:5",
        "41": "main.js:41:5",
        "42": "main.js:42:5"
    }
}"#;

pub const CONSISTENT: &str = r#"{
    "typeNameToFieldTypes": {
        "object(1)": { "x": { "number": ["2"] } }
    }
}"#;

pub const POINTS_WARNING: &str = "Warning 1: p of frame originated at main.js:1:1 has multiple types:\n\
    \x20   object originated at main.js:10:9\n\
    \x20       found at main.js:40:5\n\
    \x20       found at main.js:41:5\n\
    \x20   object originated at main.js:30:9\n\
    \x20       found at main.js:42:5\n\
    \n\
    \x20   Type diff:\n\
    \x20       .x has types number,string\n";

pub fn run_of(path: &str, json: &str) -> SnapshotRun {
    let snapshot = EngineSnapshot::from_json(json).unwrap();
    let report = analyze_snapshot(&snapshot, &AnalysisOptions::default(), &KeepAll).unwrap();
    SnapshotRun {
        path: PathBuf::from(path),
        report,
        locations: snapshot.locations(),
    }
}
