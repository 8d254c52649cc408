use std::collections::{BTreeMap, BTreeSet};

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use log::{debug, info, warn};
use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;
use rstar::RTree;

use super::config::CampusGraphConfig;
use super::sources::GraphSources;
use crate::algo::{LocalProjection, edge_weight, haversine_m};
use crate::Coordinate;
use crate::model::campus::IndexedPoint;
use crate::model::{
    AccessibilityRegistry, AliasTable, CampusGraph, CampusModel, CampusModelMeta, CampusNode,
    PathEdge,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Network,
    Manual,
    Poi,
}

impl Source {
    fn is_base(self) -> bool {
        matches!(self, Source::Network | Source::Manual)
    }
}

/// Builds the campus routing model from the three node sources
///
/// Construction never fails: data problems (unknown ids in edge lists,
/// points of interest far from the network) are logged and skipped.
pub fn create_campus_model(config: &CampusGraphConfig, sources: &GraphSources) -> CampusModel {
    info!(
        "Building campus graph from {} network, {} manual and {} point-of-interest nodes",
        sources.network.nodes.len(),
        sources.manual.nodes.len(),
        sources.pois.nodes.len()
    );

    let mut builder = GraphBuilder::new(config, sources);
    builder.add_edges();
    builder.apply_edge_splits();
    builder.heal_near_duplicates();
    let candidates = builder.largest_component();
    let registry = access_registry(config);
    let (graph, meta) = builder.finish(candidates, &registry);

    let aliases = alias_table(sources, &graph);
    let model = CampusModel::new(graph, aliases, registry, meta);

    let stats = model.stats();
    info!(
        "Campus graph ready: {} nodes, {} edges, {} snap candidates, {} destinations",
        stats.nodes, stats.edges, stats.snap_candidates, stats.destinations
    );
    model
}

struct GraphBuilder<'a> {
    config: &'a CampusGraphConfig,
    sources: &'a GraphSources,
    graph: UnGraph<CampusNode, PathEdge>,
    index: HashMap<String, NodeIndex>,
    provenance: Vec<Source>,
    meta: CampusModelMeta,
}

impl<'a> GraphBuilder<'a> {
    fn new(config: &'a CampusGraphConfig, sources: &'a GraphSources) -> Self {
        let retained = retain_campus_network(config, sources);

        // Later sources take precedence on id collision
        let mut merged: BTreeMap<&str, (Coordinate, Source)> = BTreeMap::new();
        for &id in &retained {
            merged.insert(id, (sources.network.nodes[id], Source::Network));
        }
        for (id, coord) in &sources.manual.nodes {
            merged.insert(id, (*coord, Source::Manual));
        }
        for (id, coord) in &sources.pois.nodes {
            merged.insert(id, (*coord, Source::Poi));
        }

        let mut graph = UnGraph::with_capacity(merged.len(), merged.len() * 2);
        let mut index = HashMap::with_capacity(merged.len());
        let mut provenance = Vec::with_capacity(merged.len());
        for (id, (coordinate, source)) in merged {
            let idx = graph.add_node(CampusNode {
                id: id.to_owned(),
                coordinate,
            });
            index.insert(id.to_owned(), idx);
            provenance.push(source);
        }

        Self {
            config,
            sources,
            graph,
            index,
            provenance,
            meta: CampusModelMeta::default(),
        }
    }

    fn source(&self, idx: NodeIndex) -> Source {
        self.provenance[idx.index()]
    }

    /// Add an edge, keeping the lighter weight when one already exists
    fn connect(&mut self, a: NodeIndex, b: NodeIndex) -> bool {
        if a == b {
            return false;
        }
        let weight = edge_weight(self.graph[a].coordinate, self.graph[b].coordinate);
        if let Some(existing) = self.graph.find_edge(a, b) {
            let edge = &mut self.graph[existing];
            edge.weight = edge.weight.min(weight);
            return false;
        }
        self.graph.add_edge(
            a,
            b,
            PathEdge {
                weight,
                access: Default::default(),
            },
        );
        true
    }

    fn add_edges(&mut self) {
        let sources = self.sources;
        let mut skipped = 0usize;
        for (a, b) in &sources.network.edges {
            let endpoints = (self.index.get(a).copied(), self.index.get(b).copied());
            // Network edges survive only if neither endpoint was clipped away
            if let (Some(ia), Some(ib)) = endpoints {
                self.connect(ia, ib);
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!("Skipped {skipped} network edges outside the campus area");
        }

        for (a, b) in &sources.manual.edges {
            match (self.index.get(a).copied(), self.index.get(b).copied()) {
                (Some(ia), Some(ib)) => {
                    self.connect(ia, ib);
                }
                _ => warn!("Manual edge {a}-{b} references an unknown node - skipping"),
            }
        }
    }

    fn apply_edge_splits(&mut self) {
        let config = self.config;
        for split in &config.edge_splits {
            let chain: Option<Vec<NodeIndex>> = std::iter::once(&split.from)
                .chain(&split.via)
                .chain(std::iter::once(&split.to))
                .map(|id| self.index.get(id).copied())
                .collect();
            let Some(chain) = chain else {
                warn!(
                    "Edge split {}-{} references an unknown node - skipping",
                    split.from, split.to
                );
                continue;
            };

            let (from, to) = (chain[0], chain[chain.len() - 1]);
            if let Some(direct) = self.graph.find_edge(from, to) {
                self.graph.remove_edge(direct);
            } else {
                debug!(
                    "Edge split {}-{}: no direct edge to replace",
                    split.from, split.to
                );
            }
            for pair in chain.windows(2) {
                self.connect(pair[0], pair[1]);
            }
        }
    }

    /// Join base nodes that were digitized separately but are the same place
    fn heal_near_duplicates(&mut self) {
        let base: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| self.source(idx).is_base())
            .collect();
        if base.is_empty() {
            return;
        }

        let projection = LocalProjection::new(self.graph[base[0]].coordinate);
        let rtree = RTree::bulk_load(
            base.iter()
                .map(|&idx| {
                    let p = projection.project(self.graph[idx].coordinate);
                    IndexedPoint::new([p.x(), p.y()], idx)
                })
                .collect(),
        );

        let threshold = self.config.heal_distance_m;
        let planar = threshold * 1.05 + 0.5;
        let graph = &self.graph;
        let pairs: BTreeSet<(NodeIndex, NodeIndex)> = base
            .par_iter()
            .flat_map_iter(|&a| {
                let coord = graph[a].coordinate;
                let p = projection.project(coord);
                rtree
                    .locate_within_distance([p.x(), p.y()], planar * planar)
                    .map(|point| point.data)
                    .filter(move |&b| {
                        a < b
                            && haversine_m(coord, graph[b].coordinate) <= threshold
                            && graph.find_edge(a, b).is_none()
                    })
                    .map(move |b| (a, b))
                    .collect::<Vec<_>>()
            })
            .collect();

        for (a, b) in pairs {
            if self.connect(a, b) {
                self.meta.healed_edges += 1;
            }
        }
        if self.meta.healed_edges > 0 {
            info!(
                "Healed {} near-duplicate node pairs (< {threshold} m)",
                self.meta.healed_edges
            );
        }
    }

    /// Nodes of the largest connected component of the base network
    fn largest_component(&mut self) -> Vec<NodeIndex> {
        let mut visited = FixedBitSet::with_capacity(self.graph.node_count());
        let mut largest: Vec<NodeIndex> = Vec::new();
        let mut stack = Vec::new();

        for start in self.graph.node_indices() {
            if visited.contains(start.index()) || !self.source(start).is_base() {
                continue;
            }
            self.meta.components += 1;

            let mut component = Vec::new();
            visited.insert(start.index());
            stack.push(start);
            while let Some(node) = stack.pop() {
                component.push(node);
                for next in self.graph.neighbors(node) {
                    if !visited.contains(next.index()) && self.source(next).is_base() {
                        visited.insert(next.index());
                        stack.push(next);
                    }
                }
            }

            if component.len() > largest.len() {
                largest = component;
            }
        }

        if self.meta.components > 1 {
            info!(
                "Base network has {} components; {} nodes in the largest are snap candidates",
                self.meta.components,
                largest.len()
            );
        }
        largest
    }

    /// Attach points of interest, tag edges and freeze the graph
    fn finish(
        mut self,
        candidates: Vec<NodeIndex>,
        registry: &AccessibilityRegistry,
    ) -> (CampusGraph, CampusModelMeta) {
        // Attachment needs the candidate index, which the final graph owns
        let lookup = CampusGraph::new(self.graph.clone(), candidates.clone());
        let pois: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| self.source(idx) == Source::Poi)
            .collect();

        for poi in pois {
            let id = self.graph[poi].id.clone();
            let Some((nearest, distance)) = lookup.nearest_candidate(self.graph[poi].coordinate)
            else {
                warn!("Point of interest '{id}' has no snap candidate to attach to");
                self.meta.unattached_pois.push(id);
                continue;
            };
            if distance > self.config.poi_warning_distance_m {
                warn!(
                    "Point of interest '{id}' is {distance:.0} m from the nearest path node '{}'",
                    self.graph[nearest].id
                );
                self.meta.distant_pois.push(id);
            }
            self.connect(poi, nearest);
            self.meta.attached_pois += 1;
        }

        let mut tagged = 0usize;
        for edge in self.graph.edge_indices() {
            let Some((a, b)) = self.graph.edge_endpoints(edge) else {
                continue;
            };
            let (id_a, id_b) = (&self.graph[a].id, &self.graph[b].id);
            if registry.contains(id_a, id_b) {
                tagged += 1;
            }
            let tag = registry.get_tag(id_a, id_b);
            self.graph[edge].access = tag;
        }
        if tagged < registry.len() {
            warn!(
                "{} accessibility tags name node pairs without an edge",
                registry.len() - tagged
            );
        }

        (CampusGraph::new(self.graph, candidates), self.meta)
    }
}

/// Network node ids inside the campus bounding box
fn retain_campus_network<'s>(
    config: &CampusGraphConfig,
    sources: &'s GraphSources,
) -> BTreeSet<&'s str> {
    let anchors: Vec<Coordinate> = sources
        .pois
        .nodes
        .values()
        .chain(sources.manual.nodes.values())
        .copied()
        .collect();

    let all = sources.network.nodes.keys().map(String::as_str);
    if anchors.is_empty() {
        warn!("No manual or point-of-interest nodes - keeping the whole network");
        return all.collect();
    }

    let margin = config.bbox_margin_deg;
    let (min_lat, max_lat, min_lng, max_lng) = anchors.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_lat, max_lat, min_lng, max_lng), c| {
            (
                min_lat.min(c.lat),
                max_lat.max(c.lat),
                min_lng.min(c.lng),
                max_lng.max(c.lng),
            )
        },
    );

    let retained: BTreeSet<&str> = sources
        .network
        .nodes
        .iter()
        .filter(|(_, c)| {
            (min_lat - margin..=max_lat + margin).contains(&c.lat)
                && (min_lng - margin..=max_lng + margin).contains(&c.lng)
        })
        .map(|(id, _)| id.as_str())
        .collect();

    let dropped = sources.network.nodes.len() - retained.len();
    if dropped > 0 {
        info!("Dropped {dropped} network nodes outside the campus bounding box");
    }
    retained
}

fn access_registry(config: &CampusGraphConfig) -> AccessibilityRegistry {
    let mut registry = AccessibilityRegistry::new();
    for rule in &config.access_tags {
        registry.set_tag(&rule.a, &rule.b, rule.tag);
    }
    registry
}

fn alias_table(sources: &GraphSources, graph: &CampusGraph) -> AliasTable {
    let mut aliases = AliasTable::default();
    for (name, node_id) in &sources.pois.aliases {
        if graph.node_index(node_id).is_none() {
            warn!("Alias '{name}' points to unknown node '{node_id}' - skipping");
            continue;
        }
        aliases.insert(name.clone(), node_id.clone());
    }
    aliases
}
