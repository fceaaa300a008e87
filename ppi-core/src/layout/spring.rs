//! Fruchterman-Reingold spring embedder.

use super::{random_points, LayoutAlgorithm, LayoutGraph, LayoutParams, Point};
use crate::error::Result;

/// Closest two nodes may get when computing forces.
const MIN_DISTANCE: f64 = 0.01;

/// Spring embedder with a cooling schedule.
///
/// The optimal edge length is `k = scale * 2 / sqrt(n)`, wider than the
/// classic `sqrt(1 / n)` so rescaled drawings come out spread.
#[derive(Clone, Debug)]
pub struct SpringLayout {
    /// Stop once the mean displacement per node drops below this.
    pub threshold: f64,
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self { threshold: 1e-4 }
    }
}

impl SpringLayout {
    fn optimal_distance(n: usize, scale: f64) -> f64 {
        scale * 2.0 / (n.max(1) as f64).sqrt()
    }
}

impl LayoutAlgorithm for SpringLayout {
    fn name(&self) -> &'static str {
        "spring"
    }

    fn place(&self, graph: &LayoutGraph, params: &LayoutParams) -> Result<Vec<Point>> {
        let n = graph.len();
        let mut pos = random_points(n, params.seed);
        if n < 2 {
            return Ok(pos);
        }

        let k = Self::optimal_distance(n, params.scale);
        let adj = graph.adjacency();

        let extent = |axis: usize| {
            let (lo, hi) = pos
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p[axis]), hi.max(p[axis]))
                });
            hi - lo
        };
        let mut temperature = extent(0).max(extent(1)) * 0.1;
        let cooling = temperature / (params.iterations as f64 + 1.0);

        let mut displacement = vec![[0.0f64; 2]; n];
        for _ in 0..params.iterations {
            displacement.iter_mut().for_each(|d| *d = [0.0, 0.0]);

            // Repulsion between every pair
            for i in 0..n {
                for j in i + 1..n {
                    let dx = pos[i][0] - pos[j][0];
                    let dy = pos[i][1] - pos[j][1];
                    let dist = dx.hypot(dy).max(MIN_DISTANCE);
                    let f = k * k / (dist * dist);
                    displacement[i][0] += dx * f;
                    displacement[i][1] += dy * f;
                    displacement[j][0] -= dx * f;
                    displacement[j][1] -= dy * f;
                }
            }

            // Attraction along edges
            for (i, neighbors) in adj.iter().enumerate() {
                for &(j, weight) in neighbors {
                    let dx = pos[i][0] - pos[j][0];
                    let dy = pos[i][1] - pos[j][1];
                    let dist = dx.hypot(dy).max(MIN_DISTANCE);
                    let f = weight * dist / k;
                    displacement[i][0] -= dx * f;
                    displacement[i][1] -= dy * f;
                }
            }

            let mut moved = 0.0;
            for (p, d) in pos.iter_mut().zip(&displacement) {
                let length = d[0].hypot(d[1]);
                let length = if length < MIN_DISTANCE { 0.1 } else { length };
                let step = [d[0] * temperature / length, d[1] * temperature / length];
                p[0] += step[0];
                p[1] += step[1];
                moved += step[0] * step[0] + step[1] * step[1];
            }

            temperature -= cooling;
            if moved.sqrt() / (n as f64) < self.threshold {
                break;
            }
        }

        Ok(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdf::parse_gdf;

    fn params(seed: u64) -> LayoutParams {
        LayoutParams {
            scale: 1.0,
            iterations: 50,
            seed,
        }
    }

    #[test]
    fn test_optimal_distance() {
        assert_eq!(SpringLayout::optimal_distance(4, 1.0), 1.0);
        assert_eq!(SpringLayout::optimal_distance(16, 2.0), 1.0);
    }

    #[test]
    fn test_connected_nodes_end_closer() {
        // a-b connected, c isolated
        let graph = LayoutGraph::from_graph(&parse_gdf(
            "nodedef>name\na\nb\nc\nedgedef>node1,node2,weight\na,b,5\n",
        ));
        let pos = SpringLayout::default().place(&graph, &params(3)).unwrap();
        let d = |i: usize, j: usize| (pos[i][0] - pos[j][0]).hypot(pos[i][1] - pos[j][1]);
        assert!(d(0, 1) < d(0, 2));
        assert!(d(0, 1) < d(1, 2));
    }

    #[test]
    fn test_seed_controls_result() {
        let graph = LayoutGraph::from_graph(&parse_gdf("nodedef>name\na\nb\nc\nd\n"));
        let a = SpringLayout::default().place(&graph, &params(1)).unwrap();
        let b = SpringLayout::default().place(&graph, &params(1)).unwrap();
        let c = SpringLayout::default().place(&graph, &params(2)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_iterations_returns_initial_positions() {
        let graph = LayoutGraph::from_graph(&parse_gdf("nodedef>name\na\nb\n"));
        let p = LayoutParams {
            iterations: 0,
            ..params(5)
        };
        let pos = SpringLayout::default().place(&graph, &p).unwrap();
        assert_eq!(pos, random_points(2, 5));
    }
}
