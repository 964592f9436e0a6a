use std::{cmp::Reverse, collections::BinaryHeap};

use log::{debug, trace};
use medroute_structs::Error;
use ordered_float::OrderedFloat;

use crate::{
    graph::DistanceGraph,
    route::{resolve_targets, Path, RouteBuilder, RouteResult},
};

/// Straight-line distance between the synthetic layout coordinates.
///
/// Only a search-order hint: the layout is not geographic, so this can
/// overestimate the graph distance and A* may then return a longer path
/// than Dijkstra would.
pub fn heuristic(graph: &DistanceGraph, u: u32, v: u32) -> f64 {
    graph.coordinate(u).dist(&graph.coordinate(v))
}

/// A* from `start` to `goal`. `None` if the goal cannot be reached.
///
/// Equal `f` values leave the open set in insertion order.
pub fn shortest_path(graph: &DistanceGraph, start: u32, goal: u32) -> Option<Path> {
    let n = graph.len();
    let mut g_score = vec![f64::INFINITY; n];
    let mut came_from = vec![u32::MAX; n];
    let mut open = BinaryHeap::new();
    let mut seq: u64 = 0;

    g_score[start as usize] = 0.0;
    open.push(Reverse((OrderedFloat(heuristic(graph, start, goal)), seq, start)));

    while let Some(Reverse((OrderedFloat(f), _, current))) = open.pop() {
        trace!("pop {} f={}", graph.name(current), f);
        if current == goal {
            return Some(Path {
                nodes: reconstruct_path(&came_from, current),
                distance: g_score[current as usize],
            });
        }

        for (neighbour, dist) in graph.neighbours(current).iter() {
            let tentative = g_score[current as usize] + dist;
            if tentative < g_score[*neighbour as usize] {
                came_from[*neighbour as usize] = current;
                g_score[*neighbour as usize] = tentative;
                seq += 1;
                open.push(Reverse((
                    OrderedFloat(tentative + heuristic(graph, *neighbour, goal)),
                    seq,
                    *neighbour,
                )));
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &[u32], mut current: u32) -> Vec<u32> {
    let mut path = vec![current];
    while came_from[current as usize] != u32::MAX {
        current = came_from[current as usize];
        path.push(current);
    }
    path.reverse();
    path
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

/// Nearest-unvisited-first tour for every origin, each hop found by A*.
pub fn optimize_routes(
    graph: &DistanceGraph,
    origins: &[String],
    tasks: &[String],
) -> Vec<RouteResult> {
    #[cfg(feature = "prof")]
    let _p = hprof::enter("astar optimize_routes");
    origins
        .iter()
        .map(|origin| plan_route(graph, origin, tasks))
        .collect()
}

fn plan_route(graph: &DistanceGraph, origin: &str, tasks: &[String]) -> RouteResult {
    let (origin_idx, mut unvisited) = resolve_targets(graph, origin, tasks)?;
    let mut route = RouteBuilder::new(graph, origin_idx);

    while !unvisited.is_empty() {
        let current = route.current();
        let mut best: Option<(usize, Path)> = None;
        for (i, task) in unvisited.iter().enumerate() {
            if let Some(path) = shortest_path(graph, current, *task) {
                if path.distance < best.as_ref().map(|(_, p)| p.distance).unwrap_or(f64::INFINITY) {
                    best = Some((i, path));
                }
            }
        }

        let Some((i, path)) = best else {
            debug!(
                "No remaining task reachable from {}, leaving {} out",
                graph.name(current),
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
