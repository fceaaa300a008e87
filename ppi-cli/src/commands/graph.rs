//! Graph command - Show a parsed GDF graph
//!
//! JSON output is the full Cytoscape-style graph; the table view summarizes
//! node types and connected components instead.

use std::collections::BTreeMap;

use anyhow::Result;
use colored::Colorize;
use ppi_core::{ComponentAnalysis, ComponentSummary, Graph, NameMode};
use serde::Serialize;

use super::{Context, GraphSource};
use crate::output::{OutputConfig, Outputter, TableOutput};

/// Components listed in the table view before eliding the rest.
const MAX_LISTED_COMPONENTS: usize = 20;

/// A graph plus the statistics shown in table form.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct GraphView {
    pub graph: Graph,
    #[serde(skip)]
    pub source: String,
    #[serde(skip)]
    pub components: Vec<ComponentSummary>,
}

impl GraphView {
    pub fn new(graph: Graph, source: String, mode: NameMode, ctx: &Context) -> Self {
        let mut components = ComponentAnalysis::new(&graph, mode, ctx.dict).summaries();
        components.sort_by(|a, b| {
            b.size
                .cmp(&a.size)
                .then(a.component_id.cmp(&b.component_id))
        });
        Self {
            graph,
            source,
            components,
        }
    }

    fn type_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.graph.nodes {
            *counts.entry(node.node_type()).or_insert(0) += 1;
        }
        counts
    }
}

impl Outputter for GraphView {
    fn to_table(&self, config: &OutputConfig) -> String {
        let types = self
            .type_counts()
            .iter()
            .map(|(t, n)| format!("{} {}", t, n))
            .collect::<Vec<_>>()
            .join(", ");

        let mut output = format!("{} {}\n", "Graph".bold(), self.source.cyan());
        output.push_str(&TableOutput::format_key_value(
            &[
                ("Nodes", self.graph.node_count().to_string()),
                ("Edges", self.graph.edge_count().to_string()),
                ("Components", self.components.len().to_string()),
                ("Types", if types.is_empty() { "-".to_string() } else { types }),
            ],
            config,
        ));

        if !self.components.is_empty() {
            let rows: Vec<Vec<String>> = self
                .components
                .iter()
                .take(MAX_LISTED_COMPONENTS)
                .map(|c| {
                    vec![
                        c.component_id.to_string(),
                        c.size.to_string(),
                        c.edge_count.to_string(),
                        c.protein_count.to_string(),
                    ]
                })
                .collect();
            output.push('\n');
            output.push_str(&TableOutput::from_rows(
                &["Component", "Nodes", "Edges", "Proteins"],
                &rows,
                config,
            ));
            if self.components.len() > MAX_LISTED_COMPONENTS {
                output.push_str(
                    &format!(
                        "\n  ... {} more components",
                        self.components.len() - MAX_LISTED_COMPONENTS
                    )
                    .dimmed()
                    .to_string(),
                );
            }
        }
        output
    }
}

pub fn run(ctx: &Context, source: &GraphSource, mode: NameMode) -> Result<()> {
    let graph = source.load(ctx)?;
    tracing::debug!(
        "Loaded {} with {} nodes and {} edges",
        source.describe(),
        graph.node_count(),
        graph.edge_count()
    );
    ctx.render(GraphView::new(graph, source.describe(), mode, ctx))
}
