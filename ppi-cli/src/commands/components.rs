//! Components command - Which components, per file, contain given proteins

use anyhow::{Context as _, Result};
use colored::Colorize;
use ppi_core::{component_membership, FileComponents, NameMode};
use serde::Serialize;

use super::Context;
use crate::output::{OutputConfig, Outputter, TableOutput};

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Membership {
    pub files: Vec<FileComponents>,
    #[serde(skip)]
    pub proteins: Vec<String>,
}

impl Outputter for Membership {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = String::new();
        if !self.proteins.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Components containing".bold(),
                self.proteins.join(" ").cyan()
            ));
        }

        for file in &self.files {
            output.push_str(&format!("\n{}\n", file.filename.yellow()));
            if file.components.is_empty() {
                output.push_str(&"  No matching components.\n".dimmed().to_string());
                continue;
            }
            let rows: Vec<Vec<String>> = file
                .components
                .iter()
                .map(|c| {
                    vec![
                        c.component_id.to_string(),
                        c.size.to_string(),
                        c.edge_count.to_string(),
                        c.protein_count.to_string(),
                    ]
                })
                .collect();
            output.push_str(&TableOutput::from_rows(
                &["Component", "Nodes", "Edges", "Proteins"],
                &rows,
                config,
            ));
            output.push('\n');
        }
        output.trim().to_string()
    }
}

pub fn run(ctx: &Context, network: &str, proteins: Vec<String>, names: NameMode) -> Result<()> {
    let files = ctx
        .store
        .load_network(network, ctx.dict)
        .with_context(|| format!("Failed to load network '{}'", network))?;

    let files = component_membership(&files, &proteins, names, ctx.dict);
    ctx.render(Membership { files, proteins })
}
