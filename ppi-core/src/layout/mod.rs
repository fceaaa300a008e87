//! Force-directed layout for network visualization.
//!
//! Placement runs a chain of [`LayoutAlgorithm`]s: ForceAtlas2, then
//! Kamada-Kawai, then a Fruchterman-Reingold spring embedder. The first stage
//! that produces finite coordinates for every node wins; its result is
//! rescaled so the largest absolute coordinate equals the requested scale.
//!
//! Positions are then adapted to the on-screen size of the nodes: the whole
//! drawing is spread out until node footprints cover a target fraction of the
//! bounding box, and remaining overlaps are pushed apart pairwise.
//!
//! Every stage is deterministic for a given seed. Requests without a seed use
//! [`DEFAULT_SEED`].

use std::collections::{BTreeMap, HashMap};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{PpiError, Result};
use crate::types::Graph;

mod force_atlas;
mod kamada_kawai;
mod overlap;
mod spring;

pub use force_atlas::ForceAtlas2;
pub use kamada_kawai::KamadaKawai;
pub use overlap::{pre_spread, separate, Footprints, DEFAULT_RADIUS, DEFAULT_RECT_SIDE};
pub use spring::SpringLayout;

/// A 2D coordinate.
pub type Point = [f64; 2];

/// Seed used when a request doesn't carry one.
pub const DEFAULT_SEED: u64 = 42;

fn default_scale() -> f64 {
    1.0
}

fn default_iterations() -> usize {
    50
}

fn default_padding() -> f64 {
    2.0
}

fn default_anti_overlap_iterations() -> usize {
    80
}

fn default_spread_target_coverage() -> f64 {
    0.12
}

fn default_side() -> f64 {
    DEFAULT_RECT_SIDE
}

/// On-screen node size, in layout units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    #[serde(default = "default_side")]
    pub width: f64,
    #[serde(default = "default_side")]
    pub height: f64,
}

/// A layout request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub graph: Graph,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Per-node circle radii.
    #[serde(default)]
    pub node_radii: Option<HashMap<String, f64>>,
    /// Per-node rectangle sizes. Takes precedence over radii.
    #[serde(default, alias = "nodeSizes")]
    pub node_sizes: Option<HashMap<String, NodeSize>>,
    /// Extra spacing between footprints.
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_anti_overlap_iterations")]
    pub anti_overlap_iterations: usize,
    /// Target footprint area / bounding-box area before separation.
    #[serde(default = "default_spread_target_coverage")]
    pub spread_target_coverage: f64,
}

impl LayoutRequest {
    /// A request for `graph` with every tuning knob at its default.
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            seed: None,
            scale: default_scale(),
            iterations: default_iterations(),
            node_radii: None,
            node_sizes: None,
            padding: default_padding(),
            anti_overlap_iterations: default_anti_overlap_iterations(),
            spread_target_coverage: default_spread_target_coverage(),
        }
    }

    pub fn params(&self) -> LayoutParams {
        LayoutParams {
            scale: self.scale,
            iterations: self.iterations,
            seed: self.seed.unwrap_or(DEFAULT_SEED),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LayoutResponse {
    pub positions: BTreeMap<String, Position>,
}

/// Knobs shared by every placement stage.
#[derive(Clone, Copy, Debug)]
pub struct LayoutParams {
    pub scale: f64,
    pub iterations: usize,
    pub seed: u64,
}

/// Undirected weighted graph keyed by node id.
///
/// Parallel edges collapse into one (the last weight wins) and edges naming
/// an unknown node add that node.
pub struct LayoutGraph {
    graph: UnGraph<String, f64>,
    node_map: HashMap<String, NodeIndex>,
}

impl LayoutGraph {
    pub fn from_graph(source: &Graph) -> Self {
        let mut layout = LayoutGraph {
            graph: UnGraph::default(),
            node_map: HashMap::with_capacity(source.node_count()),
        };

        for node in &source.nodes {
            if !node.id.is_empty() {
                layout.ensure_node(&node.id);
            }
        }
        for edge in &source.edges {
            if edge.source.is_empty() || edge.target.is_empty() {
                continue;
            }
            let a = layout.ensure_node(&edge.source);
            let b = layout.ensure_node(&edge.target);
            layout.graph.update_edge(a, b, edge.weight());
        }

        layout
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.node_map.insert(id.to_string(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node ids in index order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(move |idx| self.graph[idx].as_str())
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_map.get(id).map(|idx| idx.index())
    }

    pub fn inner(&self) -> &UnGraph<String, f64> {
        &self.graph
    }

    /// Weighted neighbor lists, self-loops excluded.
    pub fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![Vec::new(); self.len()];
        for edge in self.graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            if a == b {
                continue;
            }
            adj[a].push((b, *edge.weight()));
            adj[b].push((a, *edge.weight()));
        }
        adj
    }
}

/// A placement stage.
pub trait LayoutAlgorithm {
    fn name(&self) -> &'static str;

    /// Place every node of `graph`, one point per node index.
    fn place(&self, graph: &LayoutGraph, params: &LayoutParams) -> Result<Vec<Point>>;
}

/// ForceAtlas2, then Kamada-Kawai, then the spring embedder.
pub fn default_chain() -> Vec<Box<dyn LayoutAlgorithm>> {
    vec![
        Box::new(ForceAtlas2::default()),
        Box::new(KamadaKawai::default()),
        Box::new(SpringLayout::default()),
    ]
}

/// Uniform random points in the unit square.
pub(crate) fn random_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect()
}

/// Center on the mean and scale so the largest absolute coordinate is `scale`.
pub fn rescale(points: &mut [Point], scale: f64) {
    if points.is_empty() {
        return;
    }
    let n = points.len() as f64;
    let mean = [
        points.iter().map(|p| p[0]).sum::<f64>() / n,
        points.iter().map(|p| p[1]).sum::<f64>() / n,
    ];

    let mut lim: f64 = 0.0;
    for p in points.iter_mut() {
        p[0] -= mean[0];
        p[1] -= mean[1];
        lim = lim.max(p[0].abs()).max(p[1].abs());
    }
    if lim > 0.0 {
        let factor = scale / lim;
        for p in points.iter_mut() {
            p[0] *= factor;
            p[1] *= factor;
        }
    }
}

/// Run `chain` until a stage yields finite positions for every node.
pub fn place_nodes(
    graph: &LayoutGraph,
    params: &LayoutParams,
    chain: &[Box<dyn LayoutAlgorithm>],
) -> Result<Vec<Point>> {
    let n = graph.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![[0.0, 0.0]]);
    }

    for algorithm in chain {
        match algorithm.place(graph, params) {
            Ok(mut points)
                if points.len() == n && points.iter().flatten().all(|c| c.is_finite()) =>
            {
                rescale(&mut points, params.scale);
                tracing::debug!("Placed {} nodes with {}", n, algorithm.name());
                return Ok(points);
            }
            Ok(_) => tracing::debug!("{} produced non-finite positions", algorithm.name()),
            Err(e) => tracing::debug!("{} failed: {}", algorithm.name(), e),
        }
    }

    Err(PpiError::computation(
        "computing layout",
        "no placement stage produced finite positions",
    ))
}

/// Compute node positions for a layout request.
pub fn compute_layout(request: &LayoutRequest) -> Result<LayoutResponse> {
    let graph = LayoutGraph::from_graph(&request.graph);
    if graph.is_empty() {
        return Ok(LayoutResponse::default());
    }

    let mut points = place_nodes(&graph, &request.params(), &default_chain())?;

    let ids: Vec<&str> = graph.ids().collect();
    let footprints = Footprints::for_request(request, &ids);
    pre_spread(&mut points, &footprints, request.spread_target_coverage);
    let passes = separate(
        &mut points,
        &ids,
        &footprints,
        request.padding,
        request.anti_overlap_iterations,
    );
    tracing::debug!("Overlap removal finished after {} passes", passes);

    let positions = ids
        .into_iter()
        .zip(points)
        .map(|(id, [x, y])| (id.to_string(), Position { x, y }))
        .collect();
    Ok(LayoutResponse { positions })
}
