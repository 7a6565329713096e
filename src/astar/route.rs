// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::VertexId;

/// Recommended number of allowed vertex expansions in [find_route](crate::find_route)
/// before [Error::StepLimitExceeded](crate::Error::StepLimitExceeded) is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Shortest route between two vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Ids of all vertices along the route, including the start and the goal.
    pub vertices: Vec<VertexId>,

    /// Sum of weights of all roads along the route.
    pub cost: f64,
}

/// Result of a route search. Not finding a route is a normal outcome
/// when the start and goal lie in different connected components.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Found(Route),
    NoPath,
}

impl RouteOutcome {
    /// Returns true if a route was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the found route, if any.
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Found(route) => Some(route),
            Self::NoPath => None,
        }
    }

    /// Consumes the outcome, returning the found route, if any.
    pub fn into_route(self) -> Option<Route> {
        match self {
            Self::Found(route) => Some(route),
            Self::NoPath => None,
        }
    }
}
