//! Node footprints and overlap removal.

use xxhash_rust::xxh3::xxh3_64;

use super::{LayoutRequest, Point};
use crate::types::AttrValue;

/// Circle radius when none is given.
pub const DEFAULT_RADIUS: f64 = 5.0;
/// Rectangle side when a node has no size entry.
pub const DEFAULT_RECT_SIDE: f64 = 10.0;

const MIN_EXTENT: f64 = 1e-6;

/// The area each node occupies, one entry per node index.
#[derive(Clone, Debug, PartialEq)]
pub enum Footprints {
    /// `(width, height)` boxes centered on the node.
    Rects(Vec<(f64, f64)>),
    /// Disc radii.
    Circles(Vec<f64>),
}

impl Footprints {
    /// Footprints for the nodes `ids`, in that order.
    ///
    /// Rectangles are used when the request carries node sizes; otherwise
    /// circles from the request's radii, or from each node's `radius`/`size`
    /// attribute.
    pub fn for_request(request: &LayoutRequest, ids: &[&str]) -> Self {
        if let Some(sizes) = request.node_sizes.as_ref().filter(|s| !s.is_empty()) {
            let rects = ids
                .iter()
                .map(|id| match sizes.get(*id) {
                    Some(size) => (size.width.max(0.0), size.height.max(0.0)),
                    None => (DEFAULT_RECT_SIDE, DEFAULT_RECT_SIDE),
                })
                .collect();
            return Footprints::Rects(rects);
        }

        if let Some(radii) = request.node_radii.as_ref().filter(|r| !r.is_empty()) {
            let circles = ids
                .iter()
                .map(|id| radii.get(*id).copied().unwrap_or(DEFAULT_RADIUS).max(0.0))
                .collect();
            return Footprints::Circles(circles);
        }

        let circles = ids
            .iter()
            .map(|id| {
                request
                    .graph
                    .nodes
                    .iter()
                    .find(|n| n.id == *id)
                    .and_then(|n| n.attributes.get("radius").or_else(|| n.attributes.get("size")))
                    .map(|v| AttrValue::as_f64(v).unwrap_or(DEFAULT_RADIUS))
                    .unwrap_or(DEFAULT_RADIUS)
                    .max(0.0)
            })
            .collect();
        Footprints::Circles(circles)
    }

    /// Summed footprint area.
    pub fn total_area(&self) -> f64 {
        match self {
            Footprints::Rects(rects) => rects.iter().map(|(w, h)| w * h).sum(),
            Footprints::Circles(radii) => radii.iter().map(|r| std::f64::consts::PI * r * r).sum(),
        }
    }
}

/// Scale the drawing about its bounding-box center until footprints cover at
/// most `target_coverage` of the box.
pub fn pre_spread(points: &mut [Point], footprints: &Footprints, target_coverage: f64) {
    if points.is_empty() {
        return;
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points.iter() {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }

    let width = (max_x - min_x).max(MIN_EXTENT);
    let height = (max_y - min_y).max(MIN_EXTENT);
    let coverage = footprints.total_area() / (width * height);
    if coverage <= target_coverage {
        return;
    }

    let factor = (coverage / target_coverage.max(MIN_EXTENT)).sqrt();
    let cx = (min_x + max_x) / 2.0;
    let cy = (min_y + max_y) / 2.0;
    for p in points.iter_mut() {
        p[0] = cx + (p[0] - cx) * factor;
        p[1] = cy + (p[1] - cy) * factor;
    }
}

/// Direction used to split two nodes sitting on the same point.
///
/// Derived from the ids so repeated runs split them the same way.
fn coincident_direction(a: &str, b: &str) -> (f64, f64) {
    let dx = (xxh3_64(a.as_bytes()) % 3) as i64 - 1;
    let dy = (xxh3_64(b.as_bytes()) % 3) as i64 - 1;
    let dx = if dx == 0 { 1 } else { dx };
    let dy = if dy == 0 { -1 } else { dy };
    (dx as f64, dy as f64)
}

/// Push overlapping footprints apart, pair by pair.
///
/// Runs at most `max_iterations` passes and stops early after a pass that
/// moves nothing. Returns the number of passes run.
pub fn separate(
    points: &mut [Point],
    ids: &[&str],
    footprints: &Footprints,
    padding: f64,
    max_iterations: usize,
) -> usize {
    let n = points.len();
    for pass in 0..max_iterations {
        let mut moved = false;
        for i in 0..n {
            for j in i + 1..n {
                let shifted = match footprints {
                    Footprints::Rects(rects) => {
                        separate_rects(points, i, j, ids, (rects[i], rects[j]), padding)
                    }
                    Footprints::Circles(radii) => {
                        separate_circles(points, i, j, ids, radii[i] + radii[j] + padding)
                    }
                };
                moved |= shifted;
            }
        }
        if !moved {
            return pass + 1;
        }
    }
    max_iterations
}

fn separate_rects(
    points: &mut [Point],
    i: usize,
    j: usize,
    ids: &[&str],
    (a, b): ((f64, f64), (f64, f64)),
    padding: f64,
) -> bool {
    let half_w = (a.0 + b.0) / 2.0 + padding;
    let half_h = (a.1 + b.1) / 2.0 + padding;
    let dx = points[j][0] - points[i][0];
    let dy = points[j][1] - points[i][1];
    let overlap_x = half_w - dx.abs();
    let overlap_y = half_h - dy.abs();
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return false;
    }

    // A zero offset on an axis takes its sign from the node ids
    let (nudge_x, nudge_y) = coincident_direction(ids[i], ids[j]);
    let sign = |d: f64, nudge: f64| if d > 0.0 { 1.0 } else if d < 0.0 { -1.0 } else { nudge };

    // Resolve along the axis of smaller penetration
    if overlap_x < overlap_y {
        let shift = overlap_x / 2.0 * sign(dx, nudge_x);
        points[i][0] -= shift;
        points[j][0] += shift;
    } else {
        let shift = overlap_y / 2.0 * sign(dy, nudge_y);
        points[i][1] -= shift;
        points[j][1] += shift;
    }
    true
}

fn separate_circles(points: &mut [Point], i: usize, j: usize, ids: &[&str], min_dist: f64) -> bool {
    let mut dx = points[j][0] - points[i][0];
    let mut dy = points[j][1] - points[i][1];
    let mut dist = dx.hypot(dy);
    if dist == 0.0 {
        (dx, dy) = coincident_direction(ids[i], ids[j]);
        dist = dx.hypot(dy);
    }
    if dist >= min_dist {
        return false;
    }

    let overlap = (min_dist - dist) / 2.0;
    let (ux, uy) = (dx / dist, dy / dist);
    points[i][0] -= ux * overlap;
    points[i][1] -= uy * overlap;
    points[j][0] += ux * overlap;
    points[j][1] += uy * overlap;
    true
}
