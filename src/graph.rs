// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::btree_map::{BTreeMap, Entry};
use std::ops::Bound;

use crate::{earth_distance, initial_bearing, Edge, Error, Vertex, VertexId, EARTH_RADIUS_MILES};

/// Represents a road network as a set of [Vertices](Vertex) connected
/// by undirected, weighted roads.
///
/// Every road is stored twice, once in the adjacency of each endpoint,
/// always with the same weight: the great-circle distance between its
/// endpoints, in the unit of [RoadGraph::earth_radius] (miles by default).
///
/// The graph is only meant to be mutated while ingesting data. Once handed over
/// to a [Router](crate::Router), it's frozen and shared by reference only.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadGraph {
    vertices: BTreeMap<VertexId, Vertex>,
    earth_radius: f64,
}

impl Default for RoadGraph {
    fn default() -> Self {
        Self::with_earth_radius(EARTH_RADIUS_MILES)
    }
}

impl RoadGraph {
    /// Creates an empty graph measuring distances in miles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph measuring distances on a sphere with the given radius.
    /// All edge weights and route costs are expressed in the unit of `earth_radius`.
    ///
    /// Panics if `earth_radius` is not a positive finite number.
    pub fn with_earth_radius(earth_radius: f64) -> Self {
        assert!(earth_radius.is_finite() && earth_radius > 0.0);
        Self {
            vertices: BTreeMap::default(),
            earth_radius,
        }
    }

    /// Returns the radius of the sphere used for computing edge weights.
    pub fn earth_radius(&self) -> f64 {
        self.earth_radius
    }

    /// Returns the number of vertices in the graph.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns an iterator over all [Vertices](Vertex) in the graph, in increasing id order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Returns an iterator over ids of all vertices in the graph, in increasing order.
    pub fn ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// Retrieves a [Vertex] with the provided id.
    pub fn get_vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    /// Returns the latitude of a vertex.
    pub fn lat(&self, id: VertexId) -> Result<f64, Error> {
        self.require(id).map(|v| v.lat)
    }

    /// Returns the longitude of a vertex.
    pub fn lon(&self, id: VertexId) -> Result<f64, Error> {
        self.require(id).map(|v| v.lon)
    }

    /// Creates or updates a [Vertex] with the provided id.
    ///
    /// On id collision the last write wins: coordinates are overwritten and the
    /// name is cleared. Existing roads are preserved, and their weights are
    /// recomputed (on both sides) to match the new position.
    ///
    /// Positions with non-finite or out-of-range coordinates are rejected
    /// with a warning, leaving the graph untouched. Returns whether
    /// the vertex was stored.
    pub fn add_vertex(&mut self, id: VertexId, lat: f64, lon: f64) -> bool {
        if !is_valid_position(lat, lon) {
            log::warn!("vertex {id}: invalid position ({lat}, {lon}) - skipping");
            return false;
        }

        let neighbors: Vec<VertexId> = match self.vertices.entry(id) {
            Entry::Vacant(e) => {
                e.insert(Vertex {
                    id,
                    lat,
                    lon,
                    name: None,
                    adjacency: BTreeMap::default(),
                });
                return true;
            }
            Entry::Occupied(mut e) => {
                let v = e.get_mut();
                v.lat = lat;
                v.lon = lon;
                v.name = None;
                v.adjacency.keys().copied().collect()
            }
        };

        for neighbor in neighbors {
            self.link(id, neighbor);
        }
        true
    }

    /// Attaches a display name to a vertex. Does nothing if the vertex doesn't exist.
    pub fn set_name(&mut self, id: VertexId, name: Option<String>) {
        if let Some(v) = self.vertices.get_mut(&id) {
            v.name = name;
        }
    }

    /// Connects two vertices with an undirected road, weighted by the great-circle
    /// distance between them. Re-adding an existing road is harmless.
    ///
    /// Self-loops and roads to unknown vertices are not errors: they are
    /// logged and skipped. Returns whether the road was stored.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId) -> bool {
        if u == v {
            log::warn!("road {u} - {v}: self-loop - skipping");
            return false;
        }

        for id in [u, v] {
            if !self.vertices.contains_key(&id) {
                log::debug!("road {u} - {v}: unknown vertex {id} - skipping");
                return false;
            }
        }

        self.link(u, v);
        true
    }

    /// Stores the road between two existing vertices in both adjacency maps.
    fn link(&mut self, u: VertexId, v: VertexId) {
        let (Some(a), Some(b)) = (self.vertices.get(&u), self.vertices.get(&v)) else {
            return;
        };
        let weight = earth_distance(self.earth_radius, a.lat, a.lon, b.lat, b.lon);

        if let Some(a) = self.vertices.get_mut(&u) {
            a.adjacency.insert(v, weight);
        }
        if let Some(b) = self.vertices.get_mut(&v) {
            b.adjacency.insert(u, weight);
        }
    }

    /// Removes every vertex without any roads. Returns the number of removed vertices.
    ///
    /// Isolated vertices can never be part of a route, and keeping them would
    /// allow query points to snap onto them.
    pub fn prune_disconnected_vertices(&mut self) -> usize {
        let before = self.vertices.len();
        self.vertices.retain(|_, v| !v.adjacency.is_empty());
        before - self.vertices.len()
    }

    /// Returns the neighbors of a vertex together with the weights of roads leading to them.
    /// Unknown vertices have no neighbors.
    pub fn neighbors(&self, id: VertexId) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.vertices
            .get(&id)
            .into_iter()
            .flat_map(|v| v.adjacency.iter().map(|(&to, &weight)| (to, weight)))
    }

    /// Gets the weight of the road between two vertices, if one exists.
    pub fn edge_weight(&self, u: VertexId, v: VertexId) -> Option<f64> {
        self.vertices
            .get(&u)
            .and_then(|vertex| vertex.adjacency.get(&v))
            .copied()
    }

    /// Returns an iterator over all roads, each reported once with `source < dest`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices.values().flat_map(|vertex| {
            vertex
                .adjacency
                .range((Bound::Excluded(vertex.id), Bound::Unbounded))
                .map(move |(&dest, &weight)| Edge {
                    source: vertex.id,
                    dest,
                    weight,
                })
        })
    }

    /// Returns the great-circle distance between two vertices,
    /// in the unit of [RoadGraph::earth_radius].
    pub fn distance(&self, u: VertexId, v: VertexId) -> Result<f64, Error> {
        let a = self.require(u)?;
        let b = self.require(v)?;
        Ok(earth_distance(self.earth_radius, a.lat, a.lon, b.lat, b.lon))
    }

    /// Returns the initial bearing from one vertex to another, in degrees.
    /// See [initial_bearing] for the range and orientation.
    pub fn bearing(&self, u: VertexId, v: VertexId) -> Result<f64, Error> {
        let a = self.require(u)?;
        let b = self.require(v)?;
        Ok(initial_bearing(a.lat, a.lon, b.lat, b.lon))
    }

    /// Returns the bounding box of all vertices as `[min_lon, min_lat, max_lon, max_lat]`,
    /// or `None` if the graph is empty.
    pub fn bounds(&self) -> Option<[f64; 4]> {
        let mut vertices = self.vertices.values();
        let first = vertices.next()?;
        Some(vertices.fold(
            [first.lon, first.lat, first.lon, first.lat],
            |[min_lon, min_lat, max_lon, max_lat], v| {
                [
                    min_lon.min(v.lon),
                    min_lat.min(v.lat),
                    max_lon.max(v.lon),
                    max_lat.max(v.lat),
                ]
            },
        ))
    }

    fn require(&self, id: VertexId) -> Result<&Vertex, Error> {
        self.vertices.get(&id).ok_or(Error::UnknownVertex(id))
    }
}

fn is_valid_position(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0
}
