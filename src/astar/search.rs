// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::{earth_distance, Error, RoadGraph, Route, RouteOutcome, Vertex, VertexId};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: VertexId,
    cost: f64,
    score: f64,
    seq: u64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores (and earlier pushes, on ties) are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn reconstruct_path(came_from: &HashMap<VertexId, VertexId>, mut last: VertexId) -> Vec<VertexId> {
    let mut path = vec![last];

    while let Some(&v) = came_from.get(&last) {
        path.push(v);
        last = v;
    }

    path.reverse();
    path
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the shortest route between two vertices in the provided graph.
///
/// The heuristic is the great-circle distance to the goal. As every road weighs
/// exactly the great-circle distance between its endpoints, the heuristic is consistent,
/// and a vertex never needs to be expanded twice. Among candidates with equal scores,
/// the one discovered first is expanded first, making the search deterministic.
///
/// Returns [RouteOutcome::NoPath] if the goal is unreachable from the start.
///
/// `step_limit` optionally limits how many vertices may be expanded during the search
/// before returning [Error::StepLimitExceeded]. Concluding that no route exists requires
/// expanding every vertex reachable from the start, which is time-consuming on large graphs.
/// The recommended value is [DEFAULT_STEP_LIMIT](crate::DEFAULT_STEP_LIMIT).
pub fn find_route(
    g: &RoadGraph,
    from_id: VertexId,
    to_id: VertexId,
    step_limit: Option<usize>,
) -> Result<RouteOutcome, Error> {
    let from = g.get_vertex(from_id).ok_or(Error::UnknownVertex(from_id))?;
    let to = g.get_vertex(to_id).ok_or(Error::UnknownVertex(to_id))?;

    if from_id == to_id {
        return Ok(RouteOutcome::Found(Route {
            vertices: vec![from_id],
            cost: 0.0,
        }));
    }

    // Isolated vertices can't be a part of any route
    if from.degree() == 0 || to.degree() == 0 {
        return Ok(RouteOutcome::NoPath);
    }

    let radius = g.earth_radius();
    let heuristic = |v: &Vertex| earth_distance(radius, v.lat, v.lon, to.lat, to.lon);

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<VertexId, VertexId> = HashMap::default();
    let mut known_costs: HashMap<VertexId, f64> = HashMap::default();
    let mut closed: HashSet<VertexId> = HashSet::default();
    let mut steps: usize = 0;
    let mut seq: u64 = 0;

    queue.push(QueueItem {
        at: from_id,
        cost: 0.0,
        score: heuristic(from),
        seq,
    });
    known_costs.insert(from_id, 0.0);

    while let Some(item) = queue.pop() {
        if item.at == to_id {
            return Ok(RouteOutcome::Found(Route {
                vertices: reconstruct_path(&came_from, to_id),
                cost: item.cost,
            }));
        }

        // The queue may hold outdated items for already-expanded vertices
        if !closed.insert(item.at) {
            continue;
        }

        steps += 1;
        if step_limit.is_some_and(|limit| steps > limit) {
            return Err(Error::StepLimitExceeded);
        }

        for (neighbor_id, weight) in g.neighbors(item.at) {
            if closed.contains(&neighbor_id) {
                continue;
            }

            let Some(neighbor) = g.get_vertex(neighbor_id) else {
                continue;
            };

            // Check if this is the cheapest way to the neighbor
            let neighbor_cost = item.cost + weight;
            if neighbor_cost >= known_costs.get(&neighbor_id).copied().unwrap_or(f64::INFINITY) {
                continue;
            }

            came_from.insert(neighbor_id, item.at);
            known_costs.insert(neighbor_id, neighbor_cost);
            seq += 1;
            queue.push(QueueItem {
                at: neighbor_id,
                cost: neighbor_cost,
                score: neighbor_cost + heuristic(neighbor),
                seq,
            });
        }
    }

    Ok(RouteOutcome::NoPath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_STEP_LIMIT;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-6),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    /// Radius for which one degree of a great circle is exactly one unit.
    const DEGREE_RADIUS: f64 = 180.0 / std::f64::consts::PI;

    fn route_of(outcome: RouteOutcome) -> Route {
        outcome.into_route().expect("route should exist")
    }

    fn path_cost(g: &RoadGraph, path: &[VertexId]) -> f64 {
        path.windows(2)
            .map(|pair| g.edge_weight(pair[0], pair[1]).expect("path must follow roads"))
            .sum()
    }

    fn dijkstra(g: &RoadGraph, from: VertexId, to: VertexId) -> Option<f64> {
        let mut dist: HashMap<VertexId, f64> = HashMap::from([(from, 0.0)]);
        let mut done: HashSet<VertexId> = HashSet::default();

        // Quadratic selection keeps this independent from the BinaryHeap-based search
        loop {
            let (&at, &cost) = dist
                .iter()
                .filter(|(id, _)| !done.contains(*id))
                .min_by(|a, b| a.1.total_cmp(b.1))?;
            if at == to {
                return Some(cost);
            }
            done.insert(at);
            for (n, w) in g.neighbors(at) {
                let alt = cost + w;
                if alt < dist.get(&n).copied().unwrap_or(f64::INFINITY) {
                    dist.insert(n, alt);
                }
            }
        }
    }

    fn simple_graph() -> RoadGraph {
        //   7────────6
        //   │       /
        //   1───2───3───4
        //           │
        //           5       8 (isolated)
        let mut g = RoadGraph::new();
        g.add_vertex(1, 37.870, -122.270);
        g.add_vertex(2, 37.870, -122.265);
        g.add_vertex(3, 37.870, -122.260);
        g.add_vertex(4, 37.870, -122.255);
        g.add_vertex(5, 37.866, -122.260);
        g.add_vertex(6, 37.875, -122.258);
        g.add_vertex(7, 37.875, -122.270);
        g.add_vertex(8, 37.880, -122.250);
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(3, 4);
        g.add_edge(3, 5);
        g.add_edge(3, 6);
        g.add_edge(6, 7);
        g.add_edge(7, 1);
        g
    }

    #[test]
    fn straight_route() {
        let g = simple_graph();
        let route = route_of(find_route(&g, 1, 4, None).unwrap());
        assert_eq!(route.vertices, vec![1, 2, 3, 4]);
        assert_almost_eq!(route.cost, path_cost(&g, &route.vertices));
    }

    #[test]
    fn route_with_turn() {
        let g = simple_graph();
        let route = route_of(find_route(&g, 7, 5, None).unwrap());
        assert_eq!(route.vertices, vec![7, 1, 2, 3, 5]);
        assert_almost_eq!(route.cost, dijkstra(&g, 7, 5).unwrap());
    }

    #[test]
    fn route_to_self() {
        let g = simple_graph();
        let route = route_of(find_route(&g, 3, 3, None).unwrap());
        assert_eq!(route.vertices, vec![3]);
        assert_eq!(route.cost, 0.0);
    }

    #[test]
    fn isolated_vertex() {
        let g = simple_graph();
        assert_eq!(find_route(&g, 1, 8, None), Ok(RouteOutcome::NoPath));
        assert_eq!(find_route(&g, 8, 1, None), Ok(RouteOutcome::NoPath));
        assert_eq!(find_route(&g, 1, 8, Some(0)), Ok(RouteOutcome::NoPath));
    }

    #[test]
    fn disconnected_components() {
        let mut g = simple_graph();
        g.add_vertex(9, 37.881, -122.251);
        g.add_edge(8, 9);
        assert_eq!(find_route(&g, 1, 9, None), Ok(RouteOutcome::NoPath));
        assert!(find_route(&g, 8, 9, None).unwrap().is_found());
    }

    #[test]
    fn unknown_vertices() {
        let g = simple_graph();
        assert_eq!(find_route(&g, 1, 42, None), Err(Error::UnknownVertex(42)));
        assert_eq!(find_route(&g, 42, 1, None), Err(Error::UnknownVertex(42)));
    }

    #[test]
    fn step_limit() {
        let g = simple_graph();
        assert_eq!(find_route(&g, 1, 4, Some(1)), Err(Error::StepLimitExceeded));
        assert!(find_route(&g, 1, 4, Some(3)).unwrap().is_found());
    }

    #[test]
    fn square() {
        let mut g = RoadGraph::with_earth_radius(DEGREE_RADIUS);
        let (a, b, c, d) = (1, 2, 3, 4);
        g.add_vertex(a, 0.0, 0.0);
        g.add_vertex(b, 1.0, 0.0);
        g.add_vertex(c, 1.0, 1.0);
        g.add_vertex(d, 0.0, 1.0);
        g.add_edge(a, b);
        g.add_edge(b, c);
        g.add_edge(c, d);
        g.add_edge(d, a);

        let route = route_of(find_route(&g, a, c, None).unwrap());
        assert!(
            route.vertices == vec![a, b, c] || route.vertices == vec![a, d, c],
            "unexpected route: {:?}",
            route.vertices
        );
        assert!((route.cost - 2.0).abs() < 1e-3);

        // Repeated searches give the same answer
        for _ in 0..10 {
            assert_eq!(route_of(find_route(&g, a, c, None).unwrap()), route);
        }
    }

    #[test]
    fn symmetric_square_tie() {
        // Both sides of the square are mirror images across the equator,
        // so both routes cost exactly the same; the result must still be stable.
        let mut g = RoadGraph::with_earth_radius(DEGREE_RADIUS);
        g.add_vertex(1, 0.0, -0.5);
        g.add_vertex(2, 0.5, 0.0);
        g.add_vertex(3, 0.0, 0.5);
        g.add_vertex(4, -0.5, 0.0);
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(3, 4);
        g.add_edge(4, 1);

        let first = route_of(find_route(&g, 1, 3, None).unwrap());
        assert_eq!(first.vertices.len(), 3);
        assert_almost_eq!(first.cost, dijkstra(&g, 1, 3).unwrap());
        for _ in 0..10 {
            assert_eq!(route_of(find_route(&g, 1, 3, None).unwrap()), first);
        }
    }

    #[test]
    fn matches_dijkstra() {
        let mut rng = SmallRng::seed_from_u64(7);

        for round in 0..25 {
            let n: VertexId = 40 + round;
            let mut g = RoadGraph::new();
            for id in 1..=n {
                g.add_vertex(id, rng.gen_range(37.80..37.90), rng.gen_range(-122.32..-122.22));
            }

            // A random spanning tree keeps the graph connected,
            // extra random roads create alternatives.
            for id in 2..=n {
                g.add_edge(id, rng.gen_range(1..id));
            }
            for _ in 0..(2 * n) {
                g.add_edge(rng.gen_range(1..=n), rng.gen_range(1..=n));
            }

            for _ in 0..10 {
                let from = rng.gen_range(1..=n);
                let to = rng.gen_range(1..=n);
                let route = route_of(find_route(&g, from, to, Some(DEFAULT_STEP_LIMIT)).unwrap());
                assert_eq!(route.vertices.first(), Some(&from));
                assert_eq!(route.vertices.last(), Some(&to));
                assert_almost_eq!(route.cost, path_cost(&g, &route.vertices));
                assert_almost_eq!(route.cost, dijkstra(&g, from, to).unwrap());
            }
        }
    }
}
