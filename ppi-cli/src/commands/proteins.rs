//! Proteins command - Paginated unique proteins across a network

use anyhow::{Context as _, Result};
use colored::Colorize;
use ppi_core::{aggregate_proteins, NameMode, PagedProteins, ProteinQuery};
use serde::Serialize;

use super::Context;
use crate::output::{OutputConfig, Outputter, TableOutput};

/// Options for the proteins listing
#[derive(Debug, Clone)]
pub struct ProteinArgs {
    pub page: usize,
    pub size: Option<usize>,
    pub q: Option<String>,
    pub selected: Option<String>,
    pub names: NameMode,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ProteinPage {
    pub page: PagedProteins,
    #[serde(skip)]
    pub network: String,
}

impl Outputter for ProteinPage {
    fn to_table(&self, config: &OutputConfig) -> String {
        let rows: Vec<Vec<String>> = self
            .page
            .items
            .iter()
            .map(|item| {
                vec![
                    item.protein.clone(),
                    item.files.join(", "),
                    item.types.join(", "),
                ]
            })
            .collect();

        let pages = self.page.total.div_ceil(self.page.size.max(1)).max(1);
        format!(
            "{} {}\n{}\n{}",
            "Proteins in".bold(),
            self.network.cyan(),
            TableOutput::from_rows(&["Protein", "Files", "Types"], &rows, config),
            format!(
                "page {} of {} ({} proteins)",
                self.page.page, pages, self.page.total
            )
            .dimmed()
        )
    }
}

pub fn run(ctx: &Context, network: &str, args: ProteinArgs) -> Result<()> {
    let limits = ctx.config.page_limits();
    let files = ctx
        .store
        .load_network(network, ctx.dict)
        .with_context(|| format!("Failed to load network '{}'", network))?;

    let query = ProteinQuery {
        page: args.page,
        size: args.size.unwrap_or(limits.default_page_size),
        q: args.q,
        selected: args.selected,
        name_mode: args.names,
    };
    tracing::debug!("Aggregating {} files with {:?}", files.len(), query);

    let page = aggregate_proteins(&files, &query, ctx.dict, &limits)
        .with_context(|| format!("Failed to list proteins of '{}'", network))?;

    ctx.render(ProteinPage {
        page,
        network: network.to_string(),
    })
}
