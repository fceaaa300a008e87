//! Networks command - List the networks in the data directory

use anyhow::{Context as _, Result};
use colored::Colorize;
use ppi_core::NetworkInfo;
use serde::Serialize;

use super::Context;
use crate::output::{OutputConfig, Outputter, TableOutput};

/// Networks found under the data directory
#[derive(Debug, Serialize)]
pub struct NetworkList {
    pub data_dir: String,
    pub networks: Vec<NetworkInfo>,
}

impl Outputter for NetworkList {
    fn to_table(&self, config: &OutputConfig) -> String {
        let rows: Vec<Vec<String>> = self
            .networks
            .iter()
            .map(|n| vec![n.name.clone(), n.file_count.to_string()])
            .collect();

        format!(
            "{} {}\n{}",
            "Networks in".bold(),
            self.data_dir.cyan(),
            TableOutput::from_rows(&["Network", "Files"], &rows, config)
        )
    }
}

pub fn run(ctx: &Context) -> Result<()> {
    let networks = ctx
        .store
        .list_networks()
        .context("Failed to list networks")?;
    tracing::debug!("Found {} networks", networks.len());

    ctx.render(NetworkList {
        data_dir: ctx.store.root().display().to_string(),
        networks,
    })
}
