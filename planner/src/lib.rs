pub mod astar;
pub mod dijkstra;
pub mod graph;
pub mod route;

pub use graph::DistanceGraph;
pub use route::{flatten_legs, optimize_routes, Path, Route, RouteResult};

/// Sum of the total distances of the routes that could be planned.
pub fn total_distance<'a>(routes: impl IntoIterator<Item = &'a RouteResult>) -> f64 {
    routes
        .into_iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|r| r.total_distance_km)
        .sum()
}
