use serde::{Deserialize, Serialize};

/// Sensor reading for a single plant, keyed by its grid cell. Field names are
/// the wire keys the inference server expects; the eight continuous features
/// are sent in the order the model was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub fruit_redness: f64,
    pub fruit_greenness: f64,
    pub leaf_health: f64,
    pub spot_count: f64,
    pub spot_darkness: f64,
    pub surface_texture: f64,
    pub size: f64,
    pub stem_brownness: f64,
    pub x_coordinate: i32,
    pub y_coordinate: i32,
}

/// Server verdict for one analyzed plant.
///
/// Only the string-valued `cut_decision` schema is supported; the legacy
/// boolean schema is rejected as a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub x_coordinate: i32,
    pub y_coordinate: i32,
    pub probability: f64,
    pub cut_decision: CutDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutDecision {
    NoCut,
    CutPlant,
    CutNeighbors,
}

impl CutDecision {
    /// Whether this verdict marks the plant for cutting and therefore belongs
    /// in the cut result store.
    pub fn requires_cut(&self) -> bool {
        matches!(self, CutDecision::CutPlant | CutDecision::CutNeighbors)
    }

    pub fn as_wire_str(&self) -> &'static str {
        match self {
            CutDecision::NoCut => "no_cut",
            CutDecision::CutPlant => "cut_plant",
            CutDecision::CutNeighbors => "cut_neighbors",
        }
    }
}
