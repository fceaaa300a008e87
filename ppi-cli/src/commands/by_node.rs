//! By-node command - Protein makeup of the component containing a node
//!
//! With `--reference`, each protein also reports how many other components
//! of a reference file contain it.

use anyhow::{Context as _, Result};
use colored::Colorize;
use ppi_core::{component_proteins_by_node, ByNodeReport, Graph, NameMode};
use serde::Serialize;
use std::path::Path;

use super::{load_graph_path, Context, GraphSource};
use crate::output::{percent, OutputConfig, Outputter, TableOutput};

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct NodeReport {
    pub report: ByNodeReport,
    #[serde(skip)]
    pub node: String,
}

impl Outputter for NodeReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let with_reference = self
            .report
            .protein_counts
            .iter()
            .any(|p| p.other_components_in_reference.is_some());

        let mut headers = vec!["Protein", "Count", "Share", "Types", "Elsewhere"];
        if with_reference {
            headers.push("In reference");
        }

        let rows: Vec<Vec<String>> = self
            .report
            .protein_counts
            .iter()
            .map(|p| {
                let types = p
                    .type_counts
                    .0
                    .iter()
                    .map(|(t, n)| format!("{} {}", t, n))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut row = vec![
                    p.protein.clone(),
                    p.count.to_string(),
                    percent(p.ratio),
                    types,
                    p.other_components.to_string(),
                ];
                if with_reference {
                    row.push(
                        p.other_components_in_reference
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    );
                }
                row
            })
            .collect();

        format!(
            "{} {} {} {} ({} nodes)\n{}",
            "Node".bold(),
            self.node.cyan(),
            "is in component".bold(),
            self.report.component_id.to_string().yellow(),
            self.report.size,
            TableOutput::from_rows(&headers, &rows, config)
        )
    }
}

/// Resolve `--reference`: a file of the same network, or a path.
fn load_reference(ctx: &Context, source: &GraphSource, reference: &Path) -> Result<Graph> {
    match &source.network {
        Some(network) => {
            let file = reference.to_string_lossy();
            ctx.store
                .load_graph(network, &file, ctx.dict)
                .with_context(|| format!("Failed to load reference {}/{}", network, file))
        }
        None => load_graph_path(reference, ctx.dict),
    }
}

pub fn run(
    ctx: &Context,
    source: &GraphSource,
    node: &str,
    reference: Option<&Path>,
    names: NameMode,
) -> Result<()> {
    let graph = source.load(ctx)?;
    let reference = reference
        .map(|r| load_reference(ctx, source, r))
        .transpose()?;

    let report = component_proteins_by_node(&graph, node, names, ctx.dict, reference.as_ref())
        .with_context(|| format!("Failed to analyze node '{}' in {}", node, source.describe()))?;

    ctx.render(NodeReport {
        report,
        node: node.to_string(),
    })
}
