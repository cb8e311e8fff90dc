//! Emission graph command line tools.
//!
//! Provides the `emigraph` binary for working with graph snapshot files
//! outside the server: `validate` runs the standalone validator, `apply`
//! runs a mutation batch through the same Mutation API the server uses.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use emigraph_check::{admit, review};
use emigraph_core::{GraphSnapshot, Mutation};

/// Emission graph tools.
#[derive(Parser)]
#[command(name = "emigraph", about = "Emission graph consistency tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check a snapshot file against every graph invariant.
    Validate {
        /// Path to the snapshot JSON file.
        file: PathBuf,
    },
    /// Apply a batch of mutations to a snapshot file.
    Apply {
        /// Path to the snapshot JSON file.
        graph: PathBuf,

        /// Path to a JSON array of mutations.
        mutations: PathBuf,

        /// Where to write the resulting snapshot (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Validate { file } => run_validate(&file, &mut std::io::stdout()),
        Commands::Apply {
            graph,
            mutations,
            output,
        } => run_apply(&graph, &mutations, output.as_deref(), &mut std::io::stdout()),
    };
    process::exit(exit_code);
}

/// Execute the validate subcommand.
///
/// Prints one JSON finding per line. Returns exit code: 0 = clean,
/// 2 = findings, 3 = I/O or parse error.
fn run_validate(path: &Path, out: &mut impl Write) -> i32 {
    let snapshot = match read_snapshot(path) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };

    let findings = review(&snapshot);
    for detail in findings.details() {
        let line = serde_json::to_string(&detail).unwrap_or_else(|e| {
            format!("{{\"error\": \"failed to serialize finding: {}\"}}", e)
        });
        if writeln!(out, "{}", line).is_err() {
            return 3;
        }
    }

    if findings.is_empty() {
        0
    } else {
        eprintln!("{}", findings);
        2
    }
}

/// Execute the apply subcommand.
///
/// Returns exit code: 0 = applied, 1 = a mutation was rejected,
/// 2 = the input graph is invalid, 3 = I/O or parse error.
fn run_apply(
    graph_path: &Path,
    mutations_path: &Path,
    output: Option<&Path>,
    out: &mut impl Write,
) -> i32 {
    let snapshot = match read_snapshot(graph_path) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };
    let mutations: Vec<Mutation> = match read_json(mutations_path) {
        Ok(m) => m,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };

    let mut graph = match admit(snapshot) {
        Ok(g) => g,
        Err(rejection) => {
            eprintln!("Input graph is invalid: {}", rejection);
            for detail in rejection.details() {
                eprintln!("  - [{}] {}", detail.kind, detail.message);
            }
            return 2;
        }
    };

    if let Err(e) = graph.apply_batch(&mutations) {
        let kind = mutations.get(e.index).map(Mutation::kind).unwrap_or("mutation");
        eprintln!("Rejected {} at index {}: {}", kind, e.index, e.error);
        return 1;
    }

    let json = match serde_json::to_string_pretty(&graph.to_snapshot()) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error: failed to serialize graph: {}", e);
            return 3;
        }
    };
    let written = match output {
        Some(path) => fs::write(path, json + "\n").map_err(|e| format!("{}: {}", path.display(), e)),
        None => writeln!(out, "{}", json).map_err(|e| e.to_string()),
    };
    match written {
        Ok(()) => 0,
        Err(msg) => {
            eprintln!("Error: failed to write graph: {}", msg);
            3
        }
    }
}

fn read_snapshot(path: &Path) -> Result<GraphSnapshot, String> {
    read_json(path)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
}
