//! ForceAtlas2 continuous layout.
//!
//! Degree-weighted repulsion, linear attraction along edges and a weak
//! gravity towards the centroid. Step sizes adapt per node from its
//! "swinging" (how much its force changed direction since the previous
//! iteration), and globally from the ratio of swinging to traction.

use super::{random_points, LayoutAlgorithm, LayoutGraph, LayoutParams, Point};
use crate::error::{PpiError, Result};

#[derive(Clone, Debug)]
pub struct ForceAtlas2 {
    pub scaling_ratio: f64,
    pub gravity: f64,
    pub jitter_tolerance: f64,
}

impl Default for ForceAtlas2 {
    fn default() -> Self {
        Self {
            scaling_ratio: 2.0,
            gravity: 1.0,
            jitter_tolerance: 1.0,
        }
    }
}

/// Global speed state carried between iterations.
#[derive(Clone, Copy, Debug)]
struct Speed {
    speed: f64,
    efficiency: f64,
}

impl Speed {
    const MAX_RISE: f64 = 0.5;
    const MIN_EFFICIENCY: f64 = 0.05;
    const MAX_JITTER: f64 = 10.0;

    /// Adjust speed from total swinging and traction of one iteration.
    fn adapt(&mut self, n: usize, swing: f64, traction: f64, jitter_tolerance: f64) {
        let n = n as f64;
        let opt_jitter = 0.05 * n.sqrt();
        let min_jitter = opt_jitter.sqrt();
        let other = Self::MAX_JITTER.min(opt_jitter * traction / (n * n));
        let mut jitter = jitter_tolerance * min_jitter.max(other);

        if swing / traction > 2.0 {
            if self.efficiency > Self::MIN_EFFICIENCY {
                self.efficiency *= 0.5;
            }
            jitter = jitter.max(jitter_tolerance);
        }

        let target = if swing == 0.0 {
            f64::INFINITY
        } else {
            jitter * self.efficiency * traction / swing
        };

        if swing > jitter * traction {
            if self.efficiency > Self::MIN_EFFICIENCY {
                self.efficiency *= 0.7;
            }
        } else if self.speed < 1000.0 {
            self.efficiency *= 1.3;
        }

        self.speed += (target - self.speed).min(Self::MAX_RISE * self.speed);
    }
}

impl LayoutAlgorithm for ForceAtlas2 {
    fn name(&self) -> &'static str {
        "forceatlas2"
    }

    fn place(&self, graph: &LayoutGraph, params: &LayoutParams) -> Result<Vec<Point>> {
        let n = graph.len();
        let mut pos = random_points(n, params.seed);
        if n < 2 {
            return Ok(pos);
        }

        let adj = graph.adjacency();
        let mass: Vec<f64> = adj.iter().map(|nbrs| 1.0 + nbrs.len() as f64).collect();
        let mut previous = vec![[0.0f64; 2]; n];
        let mut state = Speed {
            speed: 1.0,
            efficiency: 1.0,
        };

        for _ in 0..params.iterations {
            let mut force = vec![[0.0f64; 2]; n];

            for i in 0..n {
                for j in i + 1..n {
                    let dx = pos[i][0] - pos[j][0];
                    let dy = pos[i][1] - pos[j][1];
                    let d2 = dx * dx + dy * dy;
                    if d2 == 0.0 {
                        continue;
                    }
                    let f = self.scaling_ratio * mass[i] * mass[j] / d2;
                    force[i][0] += dx * f;
                    force[i][1] += dy * f;
                    force[j][0] -= dx * f;
                    force[j][1] -= dy * f;
                }
            }

            for (i, nbrs) in adj.iter().enumerate() {
                for &(j, weight) in nbrs {
                    force[i][0] -= (pos[i][0] - pos[j][0]) * weight;
                    force[i][1] -= (pos[i][1] - pos[j][1]) * weight;
                }
            }

            let cx = pos.iter().map(|p| p[0]).sum::<f64>() / n as f64;
            let cy = pos.iter().map(|p| p[1]).sum::<f64>() / n as f64;
            for i in 0..n {
                let (gx, gy) = (pos[i][0] - cx, pos[i][1] - cy);
                let norm = gx.hypot(gy);
                if norm > 0.0 {
                    force[i][0] -= self.gravity * mass[i] * gx / norm;
                    force[i][1] -= self.gravity * mass[i] * gy / norm;
                }
            }

            let swinging: Vec<f64> = (0..n)
                .map(|i| {
                    mass[i] * (force[i][0] - previous[i][0]).hypot(force[i][1] - previous[i][1])
                })
                .collect();
            let swing: f64 = swinging.iter().sum();
            let traction: f64 = (0..n)
                .map(|i| {
                    0.5 * mass[i] * (force[i][0] + previous[i][0]).hypot(force[i][1] + previous[i][1])
                })
                .sum();
            if traction <= 0.0 {
                break;
            }
            state.adapt(n, swing, traction, self.jitter_tolerance);

            let mut moved = 0.0;
            for i in 0..n {
                let factor = state.speed / (1.0 + (state.speed * swinging[i]).sqrt());
                pos[i][0] += force[i][0] * factor;
                pos[i][1] += force[i][1] * factor;
                moved += (force[i][0] * factor).abs() + (force[i][1] * factor).abs();
            }
            if !moved.is_finite() {
                return Err(PpiError::computation(
                    "computing forceatlas2 layout",
                    "positions diverged",
                ));
            }
            if moved < 1e-10 {
                break;
            }
            previous = force;
        }

        Ok(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdf::parse_gdf;

    fn params() -> LayoutParams {
        LayoutParams {
            scale: 1.0,
            iterations: 100,
            seed: 9,
        }
    }

    fn graph(gdf: &str) -> LayoutGraph {
        LayoutGraph::from_graph(&parse_gdf(gdf))
    }

    #[test]
    fn test_positions_finite_and_distinct() {
        let g = graph("nodedef>name\na\nb\nc\nd\ne\nedgedef>node1,node2\na,b\nb,c\nc,a\nd,e\n");
        let pos = ForceAtlas2::default().place(&g, &params()).unwrap();
        assert_eq!(pos.len(), 5);
        assert!(pos.iter().flatten().all(|c| c.is_finite()));
        for i in 0..5 {
            for j in i + 1..5 {
                assert_ne!(pos[i], pos[j]);
            }
        }
    }

    #[test]
    fn test_hub_neighbors_stay_near_hub() {
        // star a-{b,c,d} plus a far-off pair e-f
        let g = graph(
            "nodedef>name\na\nb\nc\nd\ne\nf\nedgedef>node1,node2\na,b\na,c\na,d\ne,f\n",
        );
        let pos = ForceAtlas2::default().place(&g, &params()).unwrap();
        let d = |i: usize, j: usize| (pos[i][0] - pos[j][0]).hypot(pos[i][1] - pos[j][1]);
        let spoke = (d(0, 1) + d(0, 2) + d(0, 3)) / 3.0;
        let across = (d(0, 4) + d(0, 5)) / 2.0;
        assert!(spoke < across);
    }

    #[test]
    fn test_speed_rises_when_calm() {
        let mut s = Speed {
            speed: 1.0,
            efficiency: 1.0,
        };
        s.adapt(10, 0.0, 5.0, 1.0);
        assert_eq!(s.speed, 1.5);
        assert!(s.efficiency > 1.0);
    }

    #[test]
    fn test_speed_drops_when_swinging() {
        let mut s = Speed {
            speed: 1.0,
            efficiency: 1.0,
        };
        s.adapt(10, 100.0, 1.0, 1.0);
        assert!(s.speed < 1.0);
        assert!(s.efficiency < 1.0);
    }
}
