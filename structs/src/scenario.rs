use serde::{Deserialize, Serialize};

use crate::{
    drone::DroneParams,
    selection::{PayloadBasis, Selection},
};

/// Everything needed for one planning run, as read from a scenario file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(flatten)]
    pub selection: Selection,
    /// Pairwise distances in km, each unordered pair listed once.
    pub distances: Vec<(String, String, f64)>,
    #[serde(default)]
    pub payload_basis: PayloadBasis,
    #[serde(default)]
    pub drone: DroneParams,
}
