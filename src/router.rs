// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{find_route, Error, Projection, RoadGraph, RouteOutcome, SpatialIndex, VertexId};

/// Additional controls for answering queries with a [Router].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RouterOptions {
    /// `(lon, lat)` origin of the [Projection] used by the [SpatialIndex].
    /// If `None`, the middle of the graph's bounding box is used.
    pub projection_origin: Option<(f64, f64)>,

    /// Limits how many vertices may be expanded by a single route search;
    /// see [find_route]. `None` disables the limit.
    pub step_limit: Option<usize>,
}

/// Router answers routing queries over a frozen [RoadGraph].
///
/// Creating a Router finalizes the graph: vertices without any roads are pruned,
/// and every remaining vertex is inserted into a [SpatialIndex]. Afterwards neither
/// the graph nor the index are ever mutated, so a Router can be freely shared between
/// threads; every query keeps its search state to itself.
#[derive(Debug, Clone)]
pub struct Router {
    graph: RoadGraph,
    index: SpatialIndex,
    step_limit: Option<usize>,
}

impl Router {
    /// Finalizes the graph and builds the spatial index over it.
    pub fn new(mut graph: RoadGraph, options: RouterOptions) -> Self {
        let pruned = graph.prune_disconnected_vertices();
        if pruned > 0 {
            log::info!("pruned {pruned} disconnected vertices");
        }

        let projection = match options.projection_origin {
            Some((lon, lat)) => Projection::new(lon, lat),
            None => graph
                .bounds()
                .map(Projection::centered_on)
                .unwrap_or_default(),
        };

        let index = SpatialIndex::from_graph(&graph, projection);
        log::info!(
            "indexed {} vertices (tree depth {})",
            index.len(),
            index.depth()
        );

        Self {
            graph,
            index,
            step_limit: options.step_limit,
        }
    }

    /// Returns the underlying (pruned) graph.
    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    /// Returns the spatial index over the graph's vertices.
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Snaps a position onto the closest vertex of the graph.
    pub fn resolve_nearest(&self, lon: f64, lat: f64) -> Result<VertexId, Error> {
        self.index.nearest(lon, lat)
    }

    /// Finds the shortest route between the vertices closest to the provided positions.
    pub fn shortest_path(
        &self,
        start_lon: f64,
        start_lat: f64,
        dest_lon: f64,
        dest_lat: f64,
    ) -> Result<RouteOutcome, Error> {
        let start = self.resolve_nearest(start_lon, start_lat)?;
        let dest = self.resolve_nearest(dest_lon, dest_lat)?;
        log::debug!("routing from {start} to {dest}");
        self.route_between(start, dest)
    }

    /// Finds the shortest route between two vertices.
    pub fn route_between(&self, start: VertexId, dest: VertexId) -> Result<RouteOutcome, Error> {
        find_route(&self.graph, start, dest, self.step_limit)
    }

    /// Returns the great-circle distance between two vertices, in miles
    /// (or the unit of the graph's [earth radius](RoadGraph::earth_radius)).
    pub fn distance(&self, u: VertexId, v: VertexId) -> Result<f64, Error> {
        self.graph.distance(u, v)
    }

    /// Returns the initial bearing from one vertex to another, in degrees.
    pub fn bearing(&self, u: VertexId, v: VertexId) -> Result<f64, Error> {
        self.graph.bearing(u, v)
    }
}
