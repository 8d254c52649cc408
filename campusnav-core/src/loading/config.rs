use serde::Deserialize;

use crate::model::AccessTag;

/// Graph construction parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CampusGraphConfig {
    /// Margin added around the campus anchors when clipping the network (degrees, ~200 m)
    pub bbox_margin_deg: f64,
    /// Base nodes closer than this are joined by a healing edge (meters)
    pub heal_distance_m: f64,
    /// A point of interest farther than this from its attachment node is logged (meters)
    pub poi_warning_distance_m: f64,
    /// Direct edges rerouted through intermediate waypoints
    pub edge_splits: Vec<EdgeSplit>,
    /// Accessibility tags applied to specific node pairs
    pub access_tags: Vec<AccessRule>,
}

impl Default for CampusGraphConfig {
    fn default() -> Self {
        Self {
            bbox_margin_deg: 0.0022,
            heal_distance_m: 6.0,
            poi_warning_distance_m: 60.0,
            edge_splits: Vec::new(),
            access_tags: Vec::new(),
        }
    }
}

/// Replace the edge `from`-`to` with the chain `from`, `via`..., `to`
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeSplit {
    pub from: String,
    pub to: String,
    pub via: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessRule {
    pub a: String,
    pub b: String,
    #[serde(default = "stairs")]
    pub tag: AccessTag,
}

impl AccessRule {
    pub fn stairs(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            tag: AccessTag::Stairs,
        }
    }
}

fn stairs() -> AccessTag {
    AccessTag::Stairs
}
