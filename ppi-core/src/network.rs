//! Network data directory access.
//!
//! A data directory holds one sub-directory per network; each network is a
//! flat collection of `.gdf` files:
//!
//! ```text
//! data/
//!   yeast_complexes/
//!     cluster_001.gdf
//!     cluster_002.gdf
//!   human_core/
//!     ...
//! ```
//!
//! Listings are sorted by name so every caller sees a stable order.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::Serialize;

use crate::components;
use crate::dictionary::GeneDictionary;
use crate::error::{PpiError, Result};
use crate::gdf::parse_gdf_enriched;
use crate::types::Graph;

const GDF_EXTENSION: &str = "gdf";

/// A network and how many GDF files it holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    pub name: String,
    pub file_count: usize,
}

/// Read access to a data directory of networks.
#[derive(Clone, Debug)]
pub struct NetworkStore {
    root: PathBuf,
}

/// Immediate children of `dir` (depth 1), hidden entries excluded.
fn children(dir: &Path) -> impl Iterator<Item = ignore::DirEntry> {
    let mut builder = WalkBuilder::new(dir);
    builder
        .standard_filters(false)
        .hidden(true)
        .follow_links(true)
        .max_depth(Some(1));

    builder
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.depth() == 1)
}

fn is_gdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == GDF_EXTENSION)
        .unwrap_or(false)
}

fn gdf_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = children(dir)
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| is_gdf(entry.path()))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    files.sort();
    files
}

/// Reject names that would escape their parent directory.
fn check_component_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(PpiError::invalid_input(format!("invalid {} name '{}'", kind, name)));
    }
    Ok(())
}

impl NetworkStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All networks with their GDF file counts, sorted by name.
    pub fn list_networks(&self) -> Result<Vec<NetworkInfo>> {
        if !self.root.is_dir() {
            return Err(PpiError::not_found(
                "data directory",
                self.root.display().to_string(),
            ));
        }

        let mut networks: Vec<NetworkInfo> = children(&self.root)
            .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
            .map(|entry| NetworkInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                file_count: gdf_files(entry.path()).len(),
            })
            .collect();
        networks.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            "Found {} networks under {}",
            networks.len(),
            self.root.display()
        );
        Ok(networks)
    }

    /// Directory of a network, checked to exist and be a directory.
    pub fn network_dir(&self, network: &str) -> Result<PathBuf> {
        check_component_name("network", network)?;
        let dir = self.root.join(network);
        if !dir.exists() {
            return Err(PpiError::not_found("network", network));
        }
        if !dir.is_dir() {
            return Err(PpiError::invalid_input(format!(
                "'{}' is not a directory",
                network
            )));
        }
        Ok(dir)
    }

    /// Sorted `.gdf` file names of a network.
    pub fn list_files(&self, network: &str) -> Result<Vec<String>> {
        let dir = self.network_dir(network)?;
        Ok(gdf_files(&dir))
    }

    /// Raw GDF text of one file.
    pub fn read_file(&self, network: &str, file: &str) -> Result<String> {
        let dir = self.network_dir(network)?;
        check_component_name("file", file)?;
        let path = dir.join(file);
        if !path.is_file() {
            return Err(PpiError::not_found("file", file));
        }
        if !is_gdf(&path) {
            return Err(PpiError::invalid_input(format!(
                "'{}' is not a GDF file",
                file
            )));
        }

        let bytes = std::fs::read(&path).map_err(|e| PpiError::io(&path, e))?;
        String::from_utf8(bytes)
            .map_err(|e| PpiError::computation("reading GDF file", format!("{}: {}", file, e)))
    }

    /// Parse one file into an enriched graph.
    pub fn load_graph(&self, network: &str, file: &str, dict: &GeneDictionary) -> Result<Graph> {
        let content = self.read_file(network, file)?;
        Ok(parse_gdf_enriched(&content, dict))
    }

    /// Every file of a network as `(file name, graph)` pairs.
    ///
    /// A file that can't be read contributes an empty graph and a warning
    /// rather than failing the whole network.
    pub fn load_network(&self, network: &str, dict: &GeneDictionary) -> Result<Vec<(String, Graph)>> {
        let files = self.list_files(network)?;
        let graphs = files
            .into_iter()
            .map(|file| {
                let graph = match self.load_graph(network, &file, dict) {
                    Ok(graph) => graph,
                    Err(e) => {
                        tracing::warn!("Skipping {}/{}: {}", network, file, e);
                        Graph::default()
                    }
                };
                (file, graph)
            })
            .collect();
        Ok(graphs)
    }

    /// One connected component of a file, with full node attributes.
    pub fn component_subgraph(
        &self,
        network: &str,
        file: &str,
        component_id: usize,
        dict: &GeneDictionary,
    ) -> Result<Graph> {
        let graph = self.load_graph(network, file, dict)?;
        components::component_subgraph(&graph, component_id)
    }
}
