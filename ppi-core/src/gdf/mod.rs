//! GDF graph file parsing.
//!
//! GDF is a line-oriented format with a node section and an edge section,
//! each introduced by a header declaring its columns:
//!
//! ```text
//! nodedef>name VARCHAR,label VARCHAR,type VARCHAR
//! 1,'YFL039C YAL001C',reference
//! 2,'YBL007C',prediction
//! edgedef>node1 VARCHAR,node2 VARCHAR,weight DOUBLE
//! 1,2,0.8
//! ```
//!
//! Parsing is lenient: blank lines, rows that precede any header, and rows
//! too short to be meaningful are skipped rather than reported.

use std::collections::HashSet;

use crate::dictionary::GeneDictionary;
use crate::types::{AttrValue, Attributes, Edge, Graph, Node};

mod helpers;

pub use helpers::{clean_value, coerce_value, parse_header, split_row, strip_quotes};

const NODE_HEADER: &str = "nodedef>";
const EDGE_HEADER: &str = "edgedef>";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Nodes,
    Edges,
}

/// Parse GDF text into a [`Graph`].
///
/// Node ids come from the `name` column, else an explicit `id` column, else
/// the first column. Edges need `node1` and `node2`; edges whose endpoints
/// are not parsed nodes are dropped. Duplicate node ids are kept as-is.
pub fn parse_gdf(content: &str) -> Graph {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut node_attrs: Vec<String> = Vec::new();
    let mut edge_attrs: Vec<String> = Vec::new();
    let mut known_ids: HashSet<String> = HashSet::new();
    let mut section = Section::Preamble;
    let mut dropped_edges = 0usize;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(def) = line.strip_prefix(NODE_HEADER) {
            node_attrs = parse_header(def);
            section = Section::Nodes;
            continue;
        }
        if let Some(def) = line.strip_prefix(EDGE_HEADER) {
            edge_attrs = parse_header(def);
            section = Section::Edges;
            continue;
        }

        match section {
            Section::Preamble => continue,
            Section::Nodes => {
                if let Some(node) = parse_node_row(line, &node_attrs) {
                    known_ids.insert(node.id.clone());
                    nodes.push(node);
                }
            }
            Section::Edges => match parse_edge_row(line, &edge_attrs) {
                Some(edge) if known_ids.contains(&edge.source) && known_ids.contains(&edge.target) => {
                    edges.push(edge)
                }
                _ => dropped_edges += 1,
            },
        }
    }

    if dropped_edges > 0 {
        tracing::debug!("Dropped {} GDF edge rows", dropped_edges);
    }

    Graph::new(nodes, edges)
}

/// Parse GDF text and attach systematic/gene label variants to every node.
pub fn parse_gdf_enriched(content: &str, dict: &GeneDictionary) -> Graph {
    let mut graph = parse_gdf(content);
    enrich_graph(&mut graph, dict);
    graph
}

fn row_attributes(line: &str, names: &[String]) -> Attributes {
    let values = split_row(line);
    names
        .iter()
        .zip(values.iter())
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, raw)| (name.clone(), clean_value(raw)))
        .collect()
}

fn parse_node_row(line: &str, names: &[String]) -> Option<Node> {
    let mut attrs = row_attributes(line, names);

    let id = match (attrs.get("name"), attrs.get("id")) {
        (Some(name), _) => name.to_string(),
        (None, Some(explicit)) => explicit.to_string(),
        (None, None) => attrs.first()?.1.to_string(),
    };
    if id.is_empty() {
        return None;
    }
    attrs.remove("id");

    if !attrs.contains_key("label") {
        let label = attrs.get_string("name").unwrap_or_else(|| id.clone());
        attrs.insert("label", label);
    }

    Some(Node::new(id, attrs))
}

fn parse_edge_row(line: &str, names: &[String]) -> Option<Edge> {
    if split_row(line).len() < 2 {
        return None;
    }
    let mut attrs = row_attributes(line, names);

    let source = attrs.remove("node1")?.to_string();
    let target = attrs.remove("node2")?.to_string();
    if source.is_empty() || target.is_empty() {
        return None;
    }

    Some(Edge::new(source, target, attrs))
}

/// Attach `label_sys`, `label_gene`, `sys_name` and `gene_name` to each node.
///
/// Nodes with a textual label get both forms of the whole label, token by
/// token. Others map their `name` (or id) as a single identifier.
pub fn enrich_graph(graph: &mut Graph, dict: &GeneDictionary) {
    for node in &mut graph.nodes {
        enrich_node(node, dict);
    }
}

impl Graph {
    /// See [`enrich_graph`].
    pub fn enrich(&mut self, dict: &GeneDictionary) {
        enrich_graph(self, dict);
    }
}

fn enrich_node(node: &mut Node, dict: &GeneDictionary) {
    let label = match node.attributes.get("label") {
        Some(AttrValue::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    };

    match label {
        Some(label) => {
            let sys_tokens: Vec<&str> = label.split_whitespace().collect();
            let gene_tokens: Vec<&str> = sys_tokens.iter().map(|t| dict.map_token(t)).collect();
            let label_sys = sys_tokens.join(" ");
            let label_gene = gene_tokens.join(" ");

            node.attributes.insert("label_sys", label_sys.clone());
            node.attributes.insert("label_gene", label_gene.clone());
            node.attributes.insert("sys_name", label_sys);
            node.attributes.insert("gene_name", label_gene);
        }
        None => {
            let candidate = node
                .attributes
                .get_string("name")
                .unwrap_or_else(|| node.id.clone());
            let gene = dict
                .lookup(candidate.trim())
                .map(str::to_string)
                .unwrap_or_else(|| candidate.clone());

            node.attributes.insert("sys_name", candidate);
            node.attributes.insert("gene_name", gene);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str =
        "nodedef>name,label,type\n1,'ACT1',ref\n2,'SLA1',ref\nedgedef>node1,node2\n1,2";

    #[test]
    fn test_scenario_graph() {
        let graph = parse_gdf(SCENARIO);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let ids: Vec<&str> = graph.node_ids().collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(graph.nodes[0].attributes.get_string("label").as_deref(), Some("ACT1"));

        let edge = &graph.edges[0];
        assert_eq!(edge.id, "1-2");
        assert_eq!(edge.source, "1");
        assert_eq!(edge.target, "2");
    }

    #[test]
    fn test_typed_headers_and_coercion() {
        let gdf = "\
nodedef>name VARCHAR,label VARCHAR,score DOUBLE,rank INT
'YAL001C','TFC3',0.5,3
edgedef>node1 VARCHAR,node2 VARCHAR,weight DOUBLE
";
        let graph = parse_gdf(gdf);
        let attrs = &graph.nodes[0].attributes;
        assert_eq!(graph.nodes[0].id, "YAL001C");
        assert_eq!(attrs.get("score"), Some(&AttrValue::Float(0.5)));
        assert_eq!(attrs.get("rank"), Some(&AttrValue::Integer(3)));
    }

    #[test]
    fn test_node_id_resolution_order() {
        let graph = parse_gdf("nodedef>id,label\nn1,'A B'\n");
        assert_eq!(graph.nodes[0].id, "n1");
        assert!(!graph.nodes[0].attributes.contains_key("id"));

        let graph = parse_gdf("nodedef>key,label\nk9,'A'\n");
        assert_eq!(graph.nodes[0].id, "k9");
        assert!(graph.nodes[0].attributes.contains_key("key"));

        // `name` wins over an explicit `id` column
        let graph = parse_gdf("nodedef>id,name\nx,7\n");
        assert_eq!(graph.nodes[0].id, "7");
    }

    #[test]
    fn test_label_synthesized() {
        let graph = parse_gdf("nodedef>name,type\nYFL039C,ref\n");
        assert_eq!(
            graph.nodes[0].attributes.get_string("label").as_deref(),
            Some("YFL039C")
        );

        let graph = parse_gdf("nodedef>key\nk1\n");
        assert_eq!(graph.nodes[0].attributes.get_string("label").as_deref(), Some("k1"));
    }

    #[test]
    fn test_duplicate_node_ids_not_merged() {
        let graph = parse_gdf("nodedef>name,label\n1,A\n1,B\n2,C\n");
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_edges_with_missing_endpoints_dropped() {
        let gdf = "\
nodedef>name,label
1,A
2,B
edgedef>node1,node2,weight
1,2,1.5
1,99,1.0
3
2,1
";
        let graph = parse_gdf(gdf);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges[0].weight(), 1.5);
        assert!(graph.edges[0].attributes.get("node1").is_none());
    }

    #[test]
    fn test_edges_without_endpoint_columns_dropped() {
        let graph = parse_gdf("nodedef>name\n1\n2\nedgedef>from,to\n1,2\n");
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_rows_before_header_and_blank_lines_skipped() {
        let graph = parse_gdf("garbage,row\n\n   \nnodedef>name\n1\n\n2\n");
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_quoted_commas_in_labels() {
        let graph = parse_gdf("nodedef>name,label,type\n1,'ACT1, MYO1',ref\n");
        assert_eq!(
            graph.nodes[0].attributes.get_string("label").as_deref(),
            Some("ACT1, MYO1")
        );
        assert_eq!(graph.nodes[0].attributes.get_string("type").as_deref(), Some("ref"));
    }

    #[test]
    fn test_enrichment_keeps_both_forms() {
        let dict = GeneDictionary::parse("a\tb\tc\tYFL039C\tACT1\n");
        let graph = parse_gdf_enriched("nodedef>name,label\n1,'YFL039C  YBL007C'\n", &dict);
        let attrs = &graph.nodes[0].attributes;

        assert_eq!(attrs.get_string("label_sys").as_deref(), Some("YFL039C YBL007C"));
        assert_eq!(attrs.get_string("label_gene").as_deref(), Some("ACT1 YBL007C"));
        assert_eq!(attrs.get_string("sys_name"), attrs.get_string("label_sys"));
        assert_eq!(attrs.get_string("gene_name"), attrs.get_string("label_gene"));
    }

    #[test]
    fn test_enrichment_numeric_label_uses_name() {
        let dict = GeneDictionary::parse("a\tb\tc\tYFL039C\tACT1\n");
        let graph = parse_gdf_enriched("nodedef>name,label\nyfl039c,12\n", &dict);
        let attrs = &graph.nodes[0].attributes;

        assert!(attrs.get("label_sys").is_none());
        assert_eq!(attrs.get_string("sys_name").as_deref(), Some("yfl039c"));
        assert_eq!(attrs.get_string("gene_name").as_deref(), Some("ACT1"));
    }
}
