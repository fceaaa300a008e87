//! Command implementations for the PPI CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod by_node;
pub mod completions;
pub mod components;
pub mod files;
pub mod graph;
pub mod layout;
pub mod networks;
pub mod proteins;
pub mod subgraph;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::Args;
use ppi_core::{GeneDictionary, Graph, NetworkStore};

use crate::config::PpiConfig;
use crate::output::{Output, OutputConfig, Outputter};

/// State shared by every command.
pub struct Context {
    pub config: PpiConfig,
    pub store: NetworkStore,
    pub dict: &'static GeneDictionary,
    pub output: OutputConfig,
}

impl Context {
    /// Render command output with the resolved format.
    pub fn render<T: Outputter>(&self, data: T) -> anyhow::Result<()> {
        Output::new(data, self.output.clone()).render()
    }
}

/// Where a command reads its graph from.
#[derive(Args, Debug, Clone)]
pub struct GraphSource {
    /// Network (data sub-directory) holding the file
    #[arg(short, long, requires = "file")]
    pub network: Option<String>,

    /// GDF file within the network
    #[arg(short, long, requires = "network")]
    pub file: Option<String>,

    /// Read a `.gdf` or graph `.json` file directly (`-` for stdin JSON)
    #[arg(short, long, conflicts_with_all = ["network", "file"])]
    pub input: Option<PathBuf>,
}

impl GraphSource {
    /// Human-readable name of the source.
    pub fn describe(&self) -> String {
        match (&self.network, &self.file, &self.input) {
            (Some(network), Some(file), _) => format!("{}/{}", network, file),
            (_, _, Some(path)) => path.display().to_string(),
            _ => "-".to_string(),
        }
    }

    /// Load the graph, enriched with gene names.
    pub fn load(&self, ctx: &Context) -> anyhow::Result<Graph> {
        match (&self.network, &self.file, &self.input) {
            (Some(network), Some(file), _) => ctx
                .store
                .load_graph(network, file, ctx.dict)
                .with_context(|| format!("Failed to load {}/{}", network, file)),
            (_, _, Some(path)) => load_graph_path(path, ctx.dict),
            _ => bail!("Specify a graph with --network and --file, or with --input"),
        }
    }
}

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn is_gdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gdf"))
}

/// Load a graph from a `.gdf` file or from Cytoscape-style JSON.
pub fn load_graph_path(path: &Path, dict: &GeneDictionary) -> anyhow::Result<Graph> {
    let content = read_input(path)?;
    if is_gdf(path) {
        return Ok(ppi_core::parse_gdf_enriched(&content, dict));
    }
    let mut graph: Graph = serde_json::from_str(&content)
        .with_context(|| format!("{} is neither GDF nor graph JSON", path.display()))?;
    graph.enrich(dict);
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_graph_path_gdf_and_json() {
        let dir = TempDir::new().unwrap();
        let gdf = dir.path().join("g.GDF");
        std::fs::write(&gdf, "nodedef>name,label\n1,'ACT1'\n2,'SLA1'\nedgedef>node1,node2\n1,2\n")
            .unwrap();
        let json = dir.path().join("g.json");
        std::fs::write(
            &json,
            r#"{"nodes":[{"data":{"id":"a"}},{"data":{"id":"b"}}],"edges":[{"data":{"source":"a","target":"b"}}]}"#,
        )
        .unwrap();
        let dict = GeneDictionary::empty();

        let from_gdf = load_graph_path(&gdf, &dict).unwrap();
        assert_eq!(from_gdf.node_count(), 2);
        assert_eq!(from_gdf.edge_count(), 1);

        let from_json = load_graph_path(&json, &dict).unwrap();
        assert_eq!(from_json.node_count(), 2);
        assert_eq!(from_json.edges[0].id, "a-b");
    }

    #[test]
    fn test_load_graph_path_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("g.txt");
        std::fs::write(&path, "not a graph").unwrap();
        assert!(load_graph_path(&path, &GeneDictionary::empty()).is_err());
    }

    #[test]
    fn test_describe() {
        let source = GraphSource {
            network: Some("yeast".to_string()),
            file: Some("a.gdf".to_string()),
            input: None,
        };
        assert_eq!(source.describe(), "yeast/a.gdf");
    }
}
