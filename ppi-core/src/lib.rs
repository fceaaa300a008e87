//! PPI Core - protein-interaction network analysis.
//!
//! This crate turns GDF graph files into structured graphs and computes what a
//! network browser needs on top of them:
//!
//! - **GDF parsing**: typed node/edge attributes, optional gene-name enrichment
//! - **Connected components**: union-find partition with per-component protein
//!   statistics
//! - **Protein aggregation**: unique proteins across a network's files, with
//!   co-occurrence filtering and pagination
//! - **Layout**: force-directed placement with overlap removal
//!
//! # Example
//!
//! ```
//! use ppi_core::{component_proteins_by_node, parse_gdf, GeneDictionary, NameMode};
//!
//! let graph = parse_gdf("nodedef>name,label\n1,'ACT1'\n2,'SLA1'\nedgedef>node1,node2\n1,2\n");
//! let report = component_proteins_by_node(
//!     &graph,
//!     "1",
//!     NameMode::Systematic,
//!     &GeneDictionary::empty(),
//!     None,
//! )
//! .unwrap();
//! assert_eq!(report.size, 2);
//! ```

pub mod components;
pub mod dictionary;
pub mod error;
pub mod gdf;
pub mod layout;
pub mod network;
pub mod proteins;
pub mod tokens;
pub mod types;

pub use components::{
    component_proteins_by_node, component_subgraph, ByNodeReport, ComponentAnalysis,
    ComponentSummary, Components, ProteinCount, UnionFind,
};
pub use dictionary::GeneDictionary;
pub use error::{PpiError, Result};
pub use gdf::{enrich_graph, parse_gdf, parse_gdf_enriched};
pub use layout::{compute_layout, LayoutRequest, LayoutResponse, Position};
pub use network::{NetworkInfo, NetworkStore};
pub use proteins::{
    aggregate_proteins, component_membership, ComponentEntry, FileComponents, PageLimits,
    PagedProteins, ProteinItem, ProteinQuery,
};
pub use tokens::{tokenize, NameMode};
pub use types::{AttrValue, Attributes, Edge, Graph, Node};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
