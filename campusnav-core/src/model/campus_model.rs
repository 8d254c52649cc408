use std::sync::OnceLock;

use log::info;
use serde::Serialize;

use super::campus::{AccessibilityRegistry, AliasTable, CampusGraph};
use crate::RouteOptions;

/// Campus routing model: the base walking graph, its wheelchair-accessible
/// derivative, destination aliases and accessibility tags.
///
/// Built once and shared read-only. The wheelchair graph is derived on first
/// use and kept for the lifetime of the model.
#[derive(Debug)]
pub struct CampusModel {
    pub graph: CampusGraph,
    pub aliases: AliasTable,
    pub access: AccessibilityRegistry,
    pub meta: CampusModelMeta,
    wheelchair: OnceLock<CampusGraph>,
}

/// Facts recorded while the model was built
#[derive(Debug, Clone, Default)]
pub struct CampusModelMeta {
    /// Points of interest attached to the network
    pub attached_pois: usize,
    /// Points of interest farther than the warning distance from any candidate
    pub distant_pois: Vec<String>,
    /// Points of interest left without any edge to the network
    pub unattached_pois: Vec<String>,
    /// Edges added between near-duplicate nodes
    pub healed_edges: usize,
    /// Number of base connected components before candidate selection
    pub components: usize,
}

/// Summary counters for logging and health reporting
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub snap_candidates: usize,
    pub destinations: usize,
    pub attached_pois: usize,
    pub distant_pois: usize,
    pub unattached_pois: usize,
    pub healed_edges: usize,
    pub components: usize,
}

impl CampusModel {
    pub fn new(
        graph: CampusGraph,
        aliases: AliasTable,
        access: AccessibilityRegistry,
        meta: CampusModelMeta,
    ) -> Self {
        Self {
            graph,
            aliases,
            access,
            meta,
            wheelchair: OnceLock::new(),
        }
    }

    /// Graph to route on for the given options
    pub fn graph_for(&self, options: RouteOptions) -> &CampusGraph {
        if options.wheelchair {
            self.wheelchair_graph()
        } else {
            &self.graph
        }
    }

    /// Base graph without STAIRS edges, computed on first call
    pub fn wheelchair_graph(&self) -> &CampusGraph {
        self.wheelchair.get_or_init(|| {
            let filtered = self
                .graph
                .filter_edges(|_, _, edge| AccessibilityRegistry::allowed(edge.access));
            info!(
                "Wheelchair graph derived: {} of {} edges, {} snap candidates",
                filtered.edge_count(),
                self.graph.edge_count(),
                filtered.snap_candidates().len()
            );
            filtered
        })
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            snap_candidates: self.graph.snap_candidates().len(),
            destinations: self.aliases.len(),
            attached_pois: self.meta.attached_pois,
            distant_pois: self.meta.distant_pois.len(),
            unattached_pois: self.meta.unattached_pois.len(),
            healed_edges: self.meta.healed_edges,
            components: self.meta.components,
        }
    }
}
