//! Files command - List the GDF files of a network

use anyhow::{Context as _, Result};
use colored::Colorize;
use serde::Serialize;

use super::Context;
use crate::output::{OutputConfig, Outputter};

#[derive(Debug, Serialize)]
pub struct FileList {
    pub network: String,
    pub files: Vec<String>,
}

impl Outputter for FileList {
    fn to_table(&self, _config: &OutputConfig) -> String {
        let mut output = format!(
            "{} {} ({} files)\n",
            "Network".bold(),
            self.network.cyan(),
            self.files.len()
        );
        if self.files.is_empty() {
            output.push_str(&"  No GDF files found.".dimmed().to_string());
        }
        for file in &self.files {
            output.push_str(&format!("  {}\n", file));
        }
        output.trim_end().to_string()
    }
}

pub fn run(ctx: &Context, network: &str) -> Result<()> {
    let files = ctx
        .store
        .list_files(network)
        .with_context(|| format!("Failed to list files of '{}'", network))?;

    ctx.render(FileList {
        network: network.to_string(),
        files,
    })
}
