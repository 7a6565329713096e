// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Nearest-vertex snapping and shortest-path routing over road networks.
//!
//! A [RoadGraph] is filled through its ingestion API ([RoadGraph::add_vertex] and
//! [RoadGraph::add_edge]), either by hand or from [OpenStreetMap](https://www.openstreetmap.org/)
//! data with the [osm] loader. Handing the graph over to a [Router] freezes it: disconnected
//! vertices are pruned, and a [SpatialIndex] (a k-d tree over
//! [projected](Projection) positions) is built to snap arbitrary positions onto vertices.
//! Routes are found with A*, using great-circle distance both as the edge weight and
//! as the heuristic.
//!
//! # Example
//!
//! ```
//! let mut g = snaproute::RoadGraph::new();
//! g.add_vertex(1, 37.8700, -122.2600);
//! g.add_vertex(2, 37.8710, -122.2600);
//! g.add_vertex(3, 37.8710, -122.2590);
//! g.add_edge(1, 2);
//! g.add_edge(2, 3);
//!
//! let router = snaproute::Router::new(g, snaproute::RouterOptions::default());
//! let outcome = router
//!     .shortest_path(-122.2601, 37.8699, -122.2589, 37.8711)
//!     .expect("router has vertices and no step limit is hit");
//!
//! match outcome {
//!     snaproute::RouteOutcome::Found(route) => assert_eq!(route.vertices, vec![1, 2, 3]),
//!     snaproute::RouteOutcome::NoPath => unreachable!(),
//! }
//! ```

use std::collections::BTreeMap;

mod astar;
mod distance;
mod error;
mod graph;
mod kd;
pub mod osm;
mod projection;
mod router;

pub use astar::{find_route, Route, RouteOutcome, DEFAULT_STEP_LIMIT};
pub use distance::{earth_distance, initial_bearing, EARTH_RADIUS_MILES};
pub use error::Error;
pub use graph::RoadGraph;
pub use kd::SpatialIndex;
pub use projection::Projection;
pub use router::{Router, RouterOptions};

/// Identifier of a [Vertex]. Usually an OpenStreetMap node id.
pub type VertexId = u64;

/// Represents an element of the [RoadGraph] - a road intersection or a point along a road.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    pub lat: f64,
    pub lon: f64,

    /// Optional display name, e.g. from the OSM `name` tag.
    pub name: Option<String>,

    adjacency: BTreeMap<VertexId, f64>,
}

impl Vertex {
    /// Returns the number of roads connected to this vertex.
    pub fn degree(&self) -> usize {
        self.adjacency.len()
    }
}

/// Represents an undirected road between two [Vertices](Vertex).
///
/// `weight` is the great-circle distance between the endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: VertexId,
    pub dest: VertexId,
    pub weight: f64,
}
