//! Visvalingam-Whyatt polyline simplification.
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use glam::Vec2;

use super::triangle_area;

/// `f32` ordered by `total_cmp` so it can live in a heap.
#[derive(Debug, Clone, Copy)]
struct OrdF32(f32);

impl PartialEq for OrdF32 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrdF32 {}

impl PartialOrd for OrdF32 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdF32 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Linked-list node of a live point.
#[derive(Clone, Copy)]
struct Node {
    prev: Option<usize>,
    next: Option<usize>,
    version: u32,
    removed: bool,
}

/// Removes interior points whose effective triangle area is below `max_area`,
/// smallest first.
///
/// Endpoints are always kept and the output preserves input order. Inputs with
/// fewer than three points, or a non-positive `max_area`, are returned unchanged.
pub fn simplify(points: &[Vec2], max_area: f32) -> Vec<Vec2> {
    let n = points.len();
    if n < 3 || !(max_area > 0.0) {
        return points.to_vec();
    }

    let mut nodes: Vec<Node> = (0..n)
        .map(|i| Node {
            prev: i.checked_sub(1),
            next: (i + 1 < n).then_some(i + 1),
            version: 0,
            removed: false,
        })
        .collect();

    // Min-heap of (area, index, version); entries whose version no longer
    // matches the node are stale and skipped on pop.
    let mut heap: BinaryHeap<Reverse<(OrdF32, usize, u32)>> = (1..n - 1)
        .map(|i| {
            let area = triangle_area(points[i - 1], points[i], points[i + 1]);
            Reverse((OrdF32(area), i, 0))
        })
        .collect();

    let mut live = n;
    while live > 2 {
        let Some(Reverse((OrdF32(area), idx, version))) = heap.pop() else {
            break;
        };
        let node = nodes[idx];
        if node.removed || node.version != version {
            continue;
        }
        if area >= max_area {
            break;
        }

        nodes[idx].removed = true;
        live -= 1;

        let (prev, next) = (node.prev, node.next);
        if let Some(p) = prev {
            nodes[p].next = next;
            nodes[p].version += 1;
            if let (Some(pp), Some(nx)) = (nodes[p].prev, next) {
                let area = triangle_area(points[pp], points[p], points[nx]);
                heap.push(Reverse((OrdF32(area), p, nodes[p].version)));
            }
        }
        if let Some(nx) = next {
            nodes[nx].prev = prev;
            nodes[nx].version += 1;
            if let (Some(p), Some(nn)) = (prev, nodes[nx].next) {
                let area = triangle_area(points[p], points[nx], points[nn]);
                heap.push(Reverse((OrdF32(area), nx, nodes[nx].version)));
            }
        }
    }

    points
        .iter()
        .zip(&nodes)
        .filter(|(_, node)| !node.removed)
        .map(|(p, _)| *p)
        .collect()
}

/// Simplifies every path with the same area threshold.
pub fn simplify_paths(paths: &[Vec<Vec2>], max_area: f32) -> Vec<Vec<Vec2>> {
    paths.iter().map(|path| simplify(path, max_area)).collect()
}
