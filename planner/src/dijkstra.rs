use std::{cmp::Reverse, collections::BinaryHeap};

use log::{debug, trace};
use medroute_structs::Error;
use ordered_float::OrderedFloat;

use crate::{
    graph::DistanceGraph,
    route::{resolve_targets, Path, RouteBuilder, RouteResult},
};

/// Distances and predecessors from one source to every node.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    pub source: u32,
    pub distances: Vec<f64>,
    pub previous: Vec<u32>,
}

impl ShortestPathTree {
    pub fn distance_to(&self, node: u32) -> Option<f64> {
        let d = self.distances[node as usize];
        d.is_finite().then_some(d)
    }

    pub fn path_to(&self, node: u32) -> Option<Path> {
        let distance = self.distance_to(node)?;
        let mut nodes = vec![node];
        let mut current = node;
        while current != self.source {
            current = self.previous[current as usize];
            if current == u32::MAX {
                return None;
            }
            nodes.push(current);
        }
        nodes.reverse();
        Some(Path { nodes, distance })
    }
}

pub fn single_source(graph: &DistanceGraph, source: u32) -> ShortestPathTree {
    let n = graph.len();
    let mut distances = vec![f64::INFINITY; n];
    let mut previous = vec![u32::MAX; n];
    let mut queue = BinaryHeap::new();
    let mut seq: u64 = 0;

    distances[source as usize] = 0.0;
    queue.push(Reverse((OrderedFloat(0.0), seq, source)));

    while let Some(Reverse((OrderedFloat(dist), _, node))) = queue.pop() {
        if dist > distances[node as usize] {
            trace!("skip stale entry {} {}", graph.name(node), dist);
            continue;
        }

        for (neighbour, weight) in graph.neighbours(node).iter() {
            let candidate = dist + weight;
            if candidate < distances[*neighbour as usize] {
                distances[*neighbour as usize] = candidate;
                previous[*neighbour as usize] = node;
                seq += 1;
                queue.push(Reverse((OrderedFloat(candidate), seq, *neighbour)));
            }
        }
    }

    ShortestPathTree {
        source,
        distances,
        previous,
    }
}

pub fn shortest_path(graph: &DistanceGraph, start: u32, goal: u32) -> Option<Path> {
    single_source(graph, start).path_to(goal)
}

pub fn shortest_path_between(
    graph: &DistanceGraph,
    start: &str,
    goal: &str,
) -> Result<Option<Path>, Error> {
    let (s, g) = graph.lookup_pair(start, goal)?;
    Ok(shortest_path(graph, s, g))
}

/// Like [`shortest_path_between`], but an unreachable goal is an error.
pub fn require_path(graph: &DistanceGraph, start: &str, goal: &str) -> Result<Path, Error> {
    shortest_path_between(graph, start, goal)?.ok_or_else(|| Error::Unreachable {
        from: start.to_string(),
        to: goal.to_string(),
    })
}

/// Nearest-unvisited-first tour for every origin. Each hop runs one full
/// Dijkstra from the current position and picks the closest remaining task.
pub fn optimize_routes(
    graph: &DistanceGraph,
    origins: &[String],
    tasks: &[String],
) -> Vec<RouteResult> {
    #[cfg(feature = "prof")]
    let _p = hprof::enter("dijkstra optimize_routes");
    origins
        .iter()
        .map(|origin| plan_route(graph, origin, tasks))
        .collect()
}

fn plan_route(graph: &DistanceGraph, origin: &str, tasks: &[String]) -> RouteResult {
    let (origin_idx, mut unvisited) = resolve_targets(graph, origin, tasks)?;
    let mut route = RouteBuilder::new(graph, origin_idx);

    while !unvisited.is_empty() {
        let tree = single_source(graph, route.current());

        let mut nearest: Option<(usize, f64)> = None;
        for (i, task) in unvisited.iter().enumerate() {
            if let Some(d) = tree.distance_to(*task) {
                if d < nearest.map(|(_, best)| best).unwrap_or(f64::INFINITY) {
                    nearest = Some((i, d));
                }
            }
        }

        let Some((i, path)) =
            nearest.and_then(|(i, _)| tree.path_to(unvisited[i]).map(|p| (i, p)))
        else {
            debug!(
                "No remaining task reachable from {}, leaving {} out",
                graph.name(route.current()),
                unvisited.len()
            );
            break;
        };

        debug!(
            "{}: next stop {} at {:.2} km",
            origin,
            graph.name(unvisited[i]),
            path.distance
        );
        route.extend(&path);
        unvisited.remove(i);
    }

    Ok(route.finish(&unvisited))
}
