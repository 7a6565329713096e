// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::VertexId;

/// Error conditions which may be returned by queries against a [RoadGraph](crate::RoadGraph),
/// a [SpatialIndex](crate::SpatialIndex) or a [Router](crate::Router).
///
/// The absence of a route is not an error - see [RouteOutcome::NoPath](crate::RouteOutcome::NoPath).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A nearest-point query was issued against an index with no points.
    #[error("spatial index is empty")]
    EmptyIndex,

    /// The referenced vertex doesn't exist in the graph.
    #[error("unknown vertex: {0}")]
    UnknownVertex(VertexId),

    /// Route search has exceeded its limit of steps.
    /// Either the vertices are really far apart, or no route exists.
    ///
    /// Concluding that no route exists requires traversing the whole
    /// connected component, and the step limit protects against that.
    #[error("step limit exceeded")]
    StepLimitExceeded,
}
