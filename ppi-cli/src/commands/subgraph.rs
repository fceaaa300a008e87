//! Subgraph command - Extract one connected component of a file

use anyhow::{Context as _, Result};
use ppi_core::{component_subgraph, NameMode};

use super::graph::GraphView;
use super::{Context, GraphSource};

pub fn run(ctx: &Context, source: &GraphSource, component: usize, mode: NameMode) -> Result<()> {
    let subgraph = match (&source.network, &source.file) {
        (Some(network), Some(file)) => ctx
            .store
            .component_subgraph(network, file, component, ctx.dict),
        _ => component_subgraph(&source.load(ctx)?, component),
    }
    .with_context(|| format!("Failed to extract component {} of {}", component, source.describe()))?;

    let label = format!("{} [component {}]", source.describe(), component);
    ctx.render(GraphView::new(subgraph, label, mode, ctx))
}
