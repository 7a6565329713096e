// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::{Error, Projection, RoadGraph, VertexId};

#[derive(Debug, Clone, Copy)]
struct KdNode {
    id: VertexId,
    x: f64,
    y: f64,
    left: Option<usize>,
    right: Option<usize>,
}

/// SpatialIndex implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree)
/// over [projected](Projection) vertex positions, and is used to snap arbitrary positions
/// onto the closest [Vertex](crate::Vertex).
///
/// Nodes at even depths split their subtrees on the x axis, nodes at odd depths
/// on the y axis. The tree is never rebalanced, so its shape depends on the insertion
/// order. Nearest-point queries take logarithmic time on well-distributed data,
/// but degrade to linear time on degenerate (e.g. collinear, or sorted) insertions.
///
/// "Nearest" is measured by euclidean distance on the projected plane, which closely
/// follows the great-circle distance near the projection origin, but not far away from it.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    projection: Projection,
    nodes: Vec<KdNode>,
    ids: HashSet<VertexId>,
}

impl SpatialIndex {
    /// Creates an empty index using the provided projection.
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            nodes: Vec::default(),
            ids: HashSet::default(),
        }
    }

    /// Builds an index by inserting every vertex of the graph, in increasing id order.
    pub fn from_graph(g: &RoadGraph, projection: Projection) -> Self {
        let mut index = Self::new(projection);
        for v in g.vertices() {
            index.insert(v.id, v.lon, v.lat);
        }
        index
    }

    /// Returns the projection used to map positions onto the indexed plane.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Returns the number of indexed points.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if there are no indexed points.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of levels of the tree (0 for an empty index).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack: Vec<(usize, usize)> = Vec::new();
        if !self.nodes.is_empty() {
            stack.push((0, 1));
        }
        while let Some((idx, level)) = stack.pop() {
            depth = depth.max(level);
            let node = &self.nodes[idx];
            stack.extend(node.left.map(|child| (child, level + 1)));
            stack.extend(node.right.map(|child| (child, level + 1)));
        }
        depth
    }

    /// Adds a vertex at the given position to the index.
    ///
    /// Returns false (and does nothing) if a vertex with the same id was already inserted.
    pub fn insert(&mut self, id: VertexId, lon: f64, lat: f64) -> bool {
        if !self.ids.insert(id) {
            return false;
        }

        let (x, y) = self.projection.project(lon, lat);
        let new_idx = self.nodes.len();
        self.nodes.push(KdNode {
            id,
            x,
            y,
            left: None,
            right: None,
        });

        if new_idx == 0 {
            return true;
        }

        let mut idx = 0;
        let mut x_divides = true;
        loop {
            let node = &mut self.nodes[idx];
            let go_left = if x_divides { x < node.x } else { y < node.y };
            let slot = if go_left {
                &mut node.left
            } else {
                &mut node.right
            };

            match *slot {
                Some(child) => {
                    idx = child;
                    x_divides = !x_divides;
                }
                None => {
                    *slot = Some(new_idx);
                    return true;
                }
            }
        }
    }

    /// Finds the id of the indexed vertex closest to the given position.
    pub fn nearest(&self, lon: f64, lat: f64) -> Result<VertexId, Error> {
        let (x, y) = self.projection.project(lon, lat);
        self.nearest_point(x, y)
    }

    /// Finds the id of the indexed vertex closest to the given point on the projected plane.
    pub fn nearest_point(&self, x: f64, y: f64) -> Result<VertexId, Error> {
        if self.nodes.is_empty() {
            return Err(Error::EmptyIndex);
        }

        let root = &self.nodes[0];
        let mut best = Best {
            idx: 0,
            dist_sq: squared_distance(root.x, root.y, x, y),
        };

        // Pending subtrees, with the squared distance from the query point
        // to the splitting line which separates them from it.
        let mut stack: Vec<Pending> = vec![Pending {
            idx: 0,
            x_divides: true,
            bound_sq: 0.0,
        }];

        while let Some(pending) = stack.pop() {
            // A closer point is possible in a subtree if and only if
            // its splitting line is closer than the current best candidate.
            if pending.bound_sq >= best.dist_sq {
                continue;
            }

            let node = &self.nodes[pending.idx];
            let dist_sq = squared_distance(node.x, node.y, x, y);
            if dist_sq < best.dist_sq {
                best = Best {
                    idx: pending.idx,
                    dist_sq,
                };
            }

            // Signed distance from the query point to the splitting line
            let offset = if pending.x_divides { x - node.x } else { y - node.y };
            let (near, far) = if offset < 0.0 {
                (node.left, node.right)
            } else {
                (node.right, node.left)
            };

            // The near side is pushed last, so that it is fully explored first
            if let Some(child) = far {
                stack.push(Pending {
                    idx: child,
                    x_divides: !pending.x_divides,
                    bound_sq: offset * offset,
                });
            }
            if let Some(child) = near {
                stack.push(Pending {
                    idx: child,
                    x_divides: !pending.x_divides,
                    bound_sq: 0.0,
                });
            }
        }

        Ok(self.nodes[best.idx].id)
    }
}

/// Subtree waiting to be searched by [SpatialIndex::nearest_point].
#[derive(Debug, Clone, Copy)]
struct Pending {
    idx: usize,
    x_divides: bool,
    bound_sq: f64,
}

/// Candidate for the nearest point, as an index into the node arena and squared distance.
#[derive(Debug, Clone, Copy)]
struct Best {
    idx: usize,
    dist_sq: f64,
}

#[inline]
fn squared_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    dx * dx + dy * dy
}
