//! Layout command - Compute node positions for a graph
//!
//! The input is either a graph (GDF, graph JSON, or a network file) or a full
//! layout request JSON carrying a `graph` key plus tuning knobs. A request
//! JSON brings its own settings; plain graphs start from the `[layout]`
//! config. Flags override both.

use anyhow::{Context as _, Result};
use ppi_core::{compute_layout, LayoutRequest, LayoutResponse};
use serde::Serialize;

use super::{read_input, Context, GraphSource};
use crate::output::{OutputConfig, Outputter, TableOutput};

/// Layout knobs that may be set on the command line
#[derive(Debug, Clone, Default)]
pub struct LayoutOverrides {
    pub seed: Option<u64>,
    pub scale: Option<f64>,
    pub iterations: Option<usize>,
    pub padding: Option<f64>,
    pub anti_overlap_iterations: Option<usize>,
}

impl LayoutOverrides {
    fn apply(&self, request: &mut LayoutRequest) {
        if self.seed.is_some() {
            request.seed = self.seed;
        }
        if let Some(scale) = self.scale {
            request.scale = scale;
        }
        if let Some(iterations) = self.iterations {
            request.iterations = iterations;
        }
        if let Some(padding) = self.padding {
            request.padding = padding;
        }
        if let Some(passes) = self.anti_overlap_iterations {
            request.anti_overlap_iterations = passes;
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Positions(pub LayoutResponse);

impl Outputter for Positions {
    fn to_table(&self, config: &OutputConfig) -> String {
        let rows: Vec<Vec<String>> = self
            .0
            .positions
            .iter()
            .map(|(id, p)| vec![id.clone(), format!("{:.3}", p.x), format!("{:.3}", p.y)])
            .collect();
        TableOutput::from_rows(&["Node", "X", "Y"], &rows, config)
    }
}

/// Parse JSON input as a layout request when it carries a `graph` key.
fn parse_request_json(content: &str) -> Result<Option<LayoutRequest>> {
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(_) => return Ok(None),
    };
    if value.get("graph").is_none() {
        return Ok(None);
    }
    let request = serde_json::from_value(value).context("Invalid layout request")?;
    Ok(Some(request))
}

fn load_request(ctx: &Context, source: &GraphSource) -> Result<LayoutRequest> {
    if let Some(path) = &source.input {
        let is_gdf = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("gdf"));
        if !is_gdf {
            let content = read_input(path)?;
            if let Some(request) = parse_request_json(&content)? {
                return Ok(request);
            }
            let graph = serde_json::from_str(&content)
                .with_context(|| format!("{} is neither a layout request nor a graph", path.display()))?;
            let mut request = LayoutRequest::new(graph);
            ctx.config.layout.apply(&mut request);
            return Ok(request);
        }
    }

    let mut request = LayoutRequest::new(source.load(ctx)?);
    ctx.config.layout.apply(&mut request);
    Ok(request)
}

pub fn run(ctx: &Context, source: &GraphSource, overrides: &LayoutOverrides) -> Result<()> {
    let mut request = load_request(ctx, source)?;
    overrides.apply(&mut request);
    tracing::debug!(
        "Laying out {} nodes (scale {}, {} iterations)",
        request.graph.node_count(),
        request.scale,
        request.iterations
    );

    let response = compute_layout(&request)
        .with_context(|| format!("Failed to lay out {}", source.describe()))?;
    ctx.render(Positions(response))
}
