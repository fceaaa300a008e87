//! Kamada-Kawai stress layout.
//!
//! Nodes are connected by springs whose rest length is their weighted
//! graph distance. Each step moves the node with the largest energy gradient
//! by one Newton-Raphson update; gradients of the other nodes are patched
//! incrementally so a step costs O(n).
//!
//! The all-pairs distance matrix is O(n²) memory, so graphs above
//! [`KamadaKawai::max_nodes`] are refused and left to the next layout in
//! the chain.

use petgraph::algo::dijkstra;
use petgraph::visit::EdgeRef;

use super::{LayoutAlgorithm, LayoutGraph, LayoutParams, Point};
use crate::error::{PpiError, Result};

const MIN_DISTANCE: f64 = 1e-9;
const DEFAULT_MAX_NODES: usize = 1000;

#[derive(Clone, Debug)]
pub struct KamadaKawai {
    /// Stop once no node's gradient norm exceeds this.
    pub tolerance: f64,
    /// Newton steps allowed per node, times the iteration count.
    pub steps_per_node: usize,
    /// Largest graph attempted.
    pub max_nodes: usize,
}

impl Default for KamadaKawai {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            steps_per_node: 4,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// All-pairs weighted shortest paths.
///
/// Unreachable pairs get the largest finite distance (at least 1) so separate
/// components stay apart without dominating the energy.
fn distance_matrix(graph: &LayoutGraph) -> Result<Vec<Vec<f64>>> {
    let inner = graph.inner();
    if let Some(edge) = inner
        .edge_references()
        .find(|e| !(*e.weight() > 0.0 && e.weight().is_finite()))
    {
        return Err(PpiError::computation(
            "computing kamada-kawai layout",
            format!("edge weight {} is not positive", edge.weight()),
        ));
    }

    let n = graph.len();
    let mut dist = vec![vec![f64::INFINITY; n]; n];
    for start in inner.node_indices() {
        for (target, d) in dijkstra(inner, start, None, |e| *e.weight()) {
            dist[start.index()][target.index()] = d;
        }
    }

    let max_finite = dist
        .iter()
        .flatten()
        .copied()
        .filter(|d| d.is_finite())
        .fold(0.0f64, f64::max)
        .max(1.0);
    for row in dist.iter_mut() {
        for d in row.iter_mut() {
            if !d.is_finite() {
                *d = max_finite;
            }
        }
    }
    Ok(dist)
}

/// Evenly spaced points on the unit circle.
fn circle_points(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            [theta.cos(), theta.sin()]
        })
        .collect()
}

/// Springs between every pair, with rest length equal to graph distance.
struct Springs {
    length: Vec<Vec<f64>>,
}

impl Springs {
    fn new(length: Vec<Vec<f64>>) -> Self {
        Self { length }
    }

    /// Spring strength, `1 / d²` for rest length `d`.
    fn strength(&self, m: usize, i: usize) -> f64 {
        let d = self.length[m][i];
        if d > 0.0 {
            1.0 / (d * d)
        } else {
            0.0
        }
    }

    /// Gradient contribution of the spring (m, i) to node m.
    fn pair_gradient(&self, pos: &[Point], m: usize, i: usize) -> [f64; 2] {
        let dx = pos[m][0] - pos[i][0];
        let dy = pos[m][1] - pos[i][1];
        let d = dx.hypot(dy).max(MIN_DISTANCE);
        let k = self.strength(m, i);
        let l = self.length[m][i];
        [k * (dx - l * dx / d), k * (dy - l * dy / d)]
    }

    fn gradient(&self, pos: &[Point], m: usize) -> [f64; 2] {
        (0..pos.len()).filter(|&i| i != m).fold([0.0, 0.0], |acc, i| {
            let g = self.pair_gradient(pos, m, i);
            [acc[0] + g[0], acc[1] + g[1]]
        })
    }

    /// Second derivatives `(xx, xy, yy)` of the energy at node m.
    fn hessian(&self, pos: &[Point], m: usize) -> (f64, f64, f64) {
        let mut h = (0.0, 0.0, 0.0);
        for i in (0..pos.len()).filter(|&i| i != m) {
            let dx = pos[m][0] - pos[i][0];
            let dy = pos[m][1] - pos[i][1];
            let d = dx.hypot(dy).max(MIN_DISTANCE);
            let d3 = d * d * d;
            let k = self.strength(m, i);
            let l = self.length[m][i];
            h.0 += k * (1.0 - l * dy * dy / d3);
            h.1 += k * (l * dx * dy / d3);
            h.2 += k * (1.0 - l * dx * dx / d3);
        }
        h
    }
}

impl LayoutAlgorithm for KamadaKawai {
    fn name(&self) -> &'static str {
        "kamada-kawai"
    }

    fn place(&self, graph: &LayoutGraph, params: &LayoutParams) -> Result<Vec<Point>> {
        let n = graph.len();
        let mut pos = circle_points(n);
        if n < 2 {
            return Ok(pos);
        }
        if n > self.max_nodes {
            return Err(PpiError::computation(
                "computing kamada-kawai layout",
                format!("{} nodes exceeds the limit of {}", n, self.max_nodes),
            ));
        }

        let springs = Springs::new(distance_matrix(graph)?);
        let mut grad: Vec<[f64; 2]> = (0..n).map(|m| springs.gradient(&pos, m)).collect();

        let max_steps = params.iterations.max(1) * self.steps_per_node * n;
        for _ in 0..max_steps {
            let (m, norm) = grad
                .iter()
                .map(|g| g[0].hypot(g[1]))
                .enumerate()
                .fold((0, 0.0f64), |best, (i, v)| if v > best.1 { (i, v) } else { best });
            if norm < self.tolerance {
                break;
            }

            let (hxx, hxy, hyy) = springs.hessian(&pos, m);
            let det = hxx * hyy - hxy * hxy;
            if det.abs() < 1e-12 {
                return Err(PpiError::computation(
                    "computing kamada-kawai layout",
                    format!("singular hessian at node {}", m),
                ));
            }
            let step_x = (-grad[m][0] * hyy + grad[m][1] * hxy) / det;
            let step_y = (grad[m][0] * hxy - grad[m][1] * hxx) / det;

            let before: Vec<[f64; 2]> = (0..n)
                .map(|i| if i == m { [0.0, 0.0] } else { springs.pair_gradient(&pos, i, m) })
                .collect();
            pos[m][0] += step_x;
            pos[m][1] += step_y;

            for i in (0..n).filter(|&i| i != m) {
                let after = springs.pair_gradient(&pos, i, m);
                grad[i][0] += after[0] - before[i][0];
                grad[i][1] += after[1] - before[i][1];
            }
            grad[m] = springs.gradient(&pos, m);
        }

        Ok(pos)
    }
}
