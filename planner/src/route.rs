use medroute_structs::{selection::RouteStrategy, Error, Leg};
use serde::{Deserialize, Serialize};

use crate::{astar, dijkstra, graph::DistanceGraph};

pub type Planner = fn(&DistanceGraph, &[String], &[String]) -> Vec<RouteResult>;
pub type RouteResult = Result<Route, Error>;

/// A shortest path between two nodes, including both end points.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<u32>,
    pub distance: f64,
}

impl Path {
    pub fn names<'a>(&'a self, graph: &'a DistanceGraph) -> impl Iterator<Item = &'a str> {
        self.nodes.iter().map(|n| graph.name(*n))
    }
}

/// The visiting order computed for one origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin: String,
    /// Every location passed, starting at the origin. May contain
    /// intermediate nodes that are not tasks.
    pub stops: Vec<String>,
    pub total_distance_km: f64,
    /// The elementary edges flown, in order.
    pub edges: Vec<Leg>,
    /// Tasks that could not be reached from this origin.
    pub unreached: Vec<String>,
}

pub fn planner_for(strategy: RouteStrategy) -> Planner {
    match strategy {
        RouteStrategy::AStar => astar::optimize_routes,
        RouteStrategy::Dijkstra => dijkstra::optimize_routes,
    }
}

pub fn optimize_routes(
    strategy: RouteStrategy,
    graph: &DistanceGraph,
    origins: &[String],
    tasks: &[String],
) -> Vec<RouteResult> {
    planner_for(strategy)(graph, origins, tasks)
}

/// All edges of all routes, origin by origin, as one flight leg list.
pub fn flatten_legs<'a>(routes: impl IntoIterator<Item = &'a Route>) -> Vec<Leg> {
    routes
        .into_iter()
        .flat_map(|r| r.edges.iter().cloned())
        .collect()
}

/// Resolves the origin and the distinct tasks of one route computation.
pub(crate) fn resolve_targets(
    graph: &DistanceGraph,
    origin: &str,
    tasks: &[String],
) -> Result<(u32, Vec<u32>), Error> {
    let origin_idx = match tasks.first() {
        Some(first) => graph.lookup_pair(origin, first)?.0,
        None => graph.index_of(origin).ok_or_else(|| Error::MissingEdge {
            from: origin.to_string(),
            to: origin.to_string(),
        })?,
    };

    let mut task_idxs = Vec::with_capacity(tasks.len());
    for task in tasks {
        let (_, idx) = graph.lookup_pair(origin, task)?;
        if !task_idxs.contains(&idx) {
            task_idxs.push(idx);
        }
    }
    Ok((origin_idx, task_idxs))
}

pub(crate) struct RouteBuilder<'a> {
    graph: &'a DistanceGraph,
    origin: u32,
    stops: Vec<u32>,
    edges: Vec<Leg>,
    total_distance: f64,
}

impl<'a> RouteBuilder<'a> {
    pub fn new(graph: &'a DistanceGraph, origin: u32) -> Self {
        RouteBuilder {
            graph,
            origin,
            stops: vec![origin],
            edges: Vec::new(),
            total_distance: 0.0,
        }
    }

    pub fn current(&self) -> u32 {
        *self.stops.last().unwrap_or(&self.origin)
    }

    /// Appends a path starting at the current position, without repeating it.
    pub fn extend(&mut self, path: &Path) {
        debug_assert_eq!(path.nodes.first(), Some(&self.current()));
        for (a, b) in path.nodes.iter().zip(path.nodes.iter().skip(1)) {
            let weight = self
                .graph
                .edge_weight(*a, *b)
                .expect("shortest path uses graph edges");
            self.edges
                .push(Leg::new(self.graph.name(*a), self.graph.name(*b), weight));
        }
        self.stops.extend(path.nodes.iter().skip(1));
        self.total_distance += path.distance;
    }

    pub fn finish(self, unreached: &[u32]) -> Route {
        Route {
            origin: self.graph.name(self.origin).to_string(),
            stops: self
                .stops
                .iter()
                .map(|n| self.graph.name(*n).to_string())
                .collect(),
            total_distance_km: self.total_distance,
            edges: self.edges,
            unreached: unreached
                .iter()
                .map(|n| self.graph.name(*n).to_string())
                .collect(),
        }
    }
}
