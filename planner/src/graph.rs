use std::collections::HashMap;

use log::{debug, warn};
use medroute_structs::{Error, Point};
use tinyvec::TinyVec;

/// Radius of the circle the synthetic heuristic coordinates are placed on.
pub const LAYOUT_RADIUS: f64 = 10.0;

/// Undirected weighted graph over named locations.
///
/// Nodes are numbered in order of first appearance in the distance table.
/// Every node also gets a synthetic coordinate on a circle, used only to
/// order the A* search. These coordinates carry no geographic meaning and
/// the distance between them is not a lower bound on graph distance.
#[derive(Debug, Clone)]
pub struct DistanceGraph {
    names: Vec<String>,
    index: HashMap<String, u32>,
    outgoing: Vec<TinyVec<[(u32, f64); 8]>>,
    coordinates: Vec<Point>,
}

impl DistanceGraph {
    pub fn build(entries: &[(String, String, f64)]) -> Result<DistanceGraph, Error> {
        let mut graph = DistanceGraph {
            names: Vec::new(),
            index: HashMap::new(),
            outgoing: Vec::new(),
            coordinates: Vec::new(),
        };

        for (a, b, dist) in entries.iter() {
            Error::check_range("distance (km)", *dist, 0.0, f64::MAX)?;
            let a_idx = graph.add_node(a);
            let b_idx = graph.add_node(b);
            if a_idx == b_idx {
                warn!("Ignoring self-distance entry for {:?}", a);
                continue;
            }
            graph.set_edge(a_idx, b_idx, *dist);
            graph.set_edge(b_idx, a_idx, *dist);
        }

        let n = graph.names.len();
        let angle_step = 2.0 * std::f64::consts::PI / n.max(1) as f64;
        graph.coordinates = (0..n)
            .map(|i| Point::on_circle(LAYOUT_RADIUS, i as f64 * angle_step))
            .collect();

        debug!(
            "Built distance graph with {} locations and {} edges",
            n,
            graph.outgoing.iter().map(|o| o.len()).sum::<usize>() / 2
        );
        Ok(graph)
    }

    fn add_node(&mut self, name: &str) -> u32 {
        if let Some(idx) = self.index.get(name) {
            return *idx;
        }
        let idx = self.names.len() as u32;
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        self.outgoing.push(Default::default());
        idx
    }

    fn set_edge(&mut self, from: u32, to: u32, dist: f64) {
        let outgoing = &mut self.outgoing[from as usize];
        match outgoing.iter_mut().find(|(n, _)| *n == to) {
            Some(edge) => edge.1 = dist,
            None => outgoing.push((to, dist)),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    pub fn name(&self, idx: u32) -> &str {
        &self.names[idx as usize]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn neighbours(&self, idx: u32) -> &[(u32, f64)] {
        &self.outgoing[idx as usize]
    }

    pub fn coordinate(&self, idx: u32) -> Point {
        self.coordinates[idx as usize]
    }

    pub fn edge_weight(&self, from: u32, to: u32) -> Option<f64> {
        self.neighbours(from)
            .iter()
            .find(|(n, _)| *n == to)
            .map(|(_, d)| *d)
    }

    /// Resolves both names, failing with `MissingEdge` if either is unknown.
    pub fn lookup_pair(&self, from: &str, to: &str) -> Result<(u32, u32), Error> {
        match (self.index_of(from), self.index_of(to)) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(missing_edge(from, to)),
        }
    }

    /// Direct distance between two locations as given in the distance table.
    pub fn distance(&self, from: &str, to: &str) -> Result<f64, Error> {
        let (a, b) = self.lookup_pair(from, to)?;
        self.edge_weight(a, b).ok_or_else(|| missing_edge(from, to))
    }
}

fn missing_edge(from: &str, to: &str) -> Error {
    Error::MissingEdge {
        from: from.to_string(),
        to: to.to_string(),
    }
}
