// Copyright 2025 Gitgraph Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Gitgraph CLI
//!
//! Walks a repository's object database and prints the reconstructed graph
//! as a single JSON document on stdout. Logs go to stderr so stdout stays
//! machine-readable.

use anyhow::{Context, Result};
use clap::Parser;
use gitgraph_core::{LooseObjectStore, RepositoryScanner};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "gitgraph")]
#[command(about = "Reconstruct a repository's object database as a JSON graph", long_about = None)]
struct Cli {
    /// Path of the repository
    #[arg(short, long)]
    path: PathBuf,

    /// Prettify the output values: T/F
    #[arg(long)]
    pretty: Option<String>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let store = LooseObjectStore::open(&cli.path)
        .with_context(|| format!("failed to open object database under {:?}", cli.path))?;
    let graph = RepositoryScanner::new(&store)
        .scan()
        .context("failed to scan repository")?;
    info!(nodes = graph.len(), "rendering graph");

    let rendered = if cli.pretty.as_deref() == Some("T") {
        to_indented_json(&graph)?
    } else {
        serde_json::to_string(&graph)?
    };
    println!("{rendered}");
    Ok(())
}

/// Serialize with 4-space indentation (serde_json's default is 2).
fn to_indented_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use gitgraph_core::RepositoryGraph;
    use std::io::Write as _;

    #[test]
    fn test_indented_json_uses_four_spaces() {
        let mut map = serde_json::Map::new();
        map.insert("key".to_string(), serde_json::json!(["a"]));
        let rendered = to_indented_json(&map).unwrap();
        assert!(rendered.contains("\n    \"key\""));
        assert!(rendered.contains("\n        \"a\""));
    }

    #[test]
    fn test_scan_renders_compact_json_by_default() {
        let repo = tempfile::tempdir().unwrap();
        let objects = repo.path().join(".git/objects/aa");
        std::fs::create_dir_all(&objects).unwrap();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"blob 3\0hi\n").unwrap();
        std::fs::write(
            objects.join("5c8683327cbe20c7d8d2f6f4b9bb50e9b1a355"),
            encoder.finish().unwrap(),
        )
        .unwrap();

        let store = LooseObjectStore::open(repo.path()).unwrap();
        let graph: RepositoryGraph = RepositoryScanner::new(&store).scan().unwrap();
        let compact = serde_json::to_string(&graph).unwrap();
        assert!(!compact.contains('\n'));
        assert!(compact.starts_with("{\"aa5c8683327cbe20c7d8d2f6f4b9bb50e9b1a355\""));
    }

    #[test]
    fn test_pretty_flag_requires_literal_t() {
        let cli = Cli::parse_from(["gitgraph", "--path", "/tmp/repo", "--pretty", "F"]);
        assert_ne!(cli.pretty.as_deref(), Some("T"));

        let cli = Cli::parse_from(["gitgraph", "--path", "/tmp/repo", "--pretty", "T"]);
        assert_eq!(cli.pretty.as_deref(), Some("T"));

        let cli = Cli::parse_from(["gitgraph", "--path", "/tmp/repo"]);
        assert_eq!(cli.pretty, None);
    }
}
