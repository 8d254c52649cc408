use hashbrown::HashMap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rstar::{RTree, primitives::GeomWithData};

use super::components::{CampusNode, PathEdge};
use crate::algo::{LocalProjection, haversine_m};
use crate::{Coordinate, Meters};

pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// How many planar nearest neighbours are re-ranked by great-circle distance
const NEAREST_RERANK: usize = 8;

/// Undirected walking graph of the campus
///
/// Snap candidates (nodes of the largest connected component of the path
/// network) are indexed in an R-tree in a local metric projection, so radius
/// queries are planar first and then confirmed with the haversine distance.
#[derive(Debug, Clone)]
pub struct CampusGraph {
    pub(crate) graph: UnGraph<CampusNode, PathEdge>,
    index: HashMap<String, NodeIndex>,
    snap_candidates: Vec<NodeIndex>,
    rtree: RTree<IndexedPoint>,
    projection: LocalProjection,
}

impl CampusGraph {
    pub(crate) fn new(
        graph: UnGraph<CampusNode, PathEdge>,
        mut snap_candidates: Vec<NodeIndex>,
    ) -> Self {
        let index = graph
            .node_indices()
            .map(|idx| (graph[idx].id.clone(), idx))
            .collect();
        snap_candidates.sort_unstable();
        snap_candidates.dedup();

        let projection = LocalProjection::new(centroid(&graph, &snap_candidates));
        let rtree = build_rtree(&graph, &snap_candidates, &projection);

        Self {
            graph,
            index,
            snap_candidates,
            rtree,
            projection,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &CampusNode {
        &self.graph[idx]
    }

    pub fn node_id(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].id
    }

    pub fn coordinate(&self, idx: NodeIndex) -> Coordinate {
        self.graph[idx].coordinate
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &CampusNode)> {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// All edges as `(a, b, edge)` with each undirected edge reported once
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &PathEdge)> {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), edge.weight()))
    }

    /// Neighbours of `idx` with the connecting edge weight
    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, Meters)> + '_ {
        self.graph
            .edges(idx)
            .map(|edge| (edge.target(), edge.weight().weight))
    }

    pub fn edge_weight(&self, a: NodeIndex, b: NodeIndex) -> Option<Meters> {
        self.graph
            .find_edge(a, b)
            .map(|edge| self.graph[edge].weight)
    }

    pub fn snap_candidates(&self) -> &[NodeIndex] {
        &self.snap_candidates
    }

    pub fn is_snap_candidate(&self, idx: NodeIndex) -> bool {
        self.snap_candidates.binary_search(&idx).is_ok()
    }

    /// Snap candidates within `radius_m` of `target`, nearest first
    pub fn candidates_within(&self, target: Coordinate, radius_m: f64) -> Vec<(NodeIndex, f64)> {
        let query = self.projection.project(target);
        // Planar search radius padded for projection drift away from the origin
        let planar_radius = radius_m * 1.05 + 1.0;

        let mut found: Vec<(NodeIndex, f64)> = self
            .rtree
            .locate_within_distance([query.x(), query.y()], planar_radius * planar_radius)
            .map(|point| (point.data, haversine_m(target, self.coordinate(point.data))))
            .filter(|&(_, distance)| distance <= radius_m)
            .collect();

        found.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        found
    }

    /// Nearest snap candidate by great-circle distance
    pub fn nearest_candidate(&self, target: Coordinate) -> Option<(NodeIndex, f64)> {
        let query = self.projection.project(target);
        self.rtree
            .nearest_neighbor_iter(&[query.x(), query.y()])
            .take(NEAREST_RERANK)
            .map(|point| (point.data, haversine_m(target, self.coordinate(point.data))))
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
    }

    /// Coordinates of a node path, in order
    pub fn path_coordinates(&self, path: &[NodeIndex]) -> Vec<Coordinate> {
        path.iter().map(|&idx| self.coordinate(idx)).collect()
    }

    /// Copy of the graph keeping only edges accepted by `keep`.
    ///
    /// Node indices are preserved. Snap candidates are restricted to the ones
    /// that still have at least one edge.
    pub fn filter_edges<F>(&self, mut keep: F) -> CampusGraph
    where
        F: FnMut(&CampusNode, &CampusNode, &PathEdge) -> bool,
    {
        let filtered = self.graph.filter_map(
            |_, node| Some(node.clone()),
            |edge_idx, edge| {
                let (a, b) = self.graph.edge_endpoints(edge_idx)?;
                keep(&self.graph[a], &self.graph[b], edge).then_some(*edge)
            },
        );

        let candidates = self
            .snap_candidates
            .iter()
            .copied()
            .filter(|&idx| filtered.neighbors(idx).next().is_some())
            .collect();

        CampusGraph::new(filtered, candidates)
    }
}

fn centroid(graph: &UnGraph<CampusNode, PathEdge>, nodes: &[NodeIndex]) -> Coordinate {
    if nodes.is_empty() {
        return Coordinate::new(0.0, 0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let n = nodes.len() as f64;
    let (lat, lng) = nodes.iter().fold((0.0, 0.0), |(lat, lng), &idx| {
        let c = graph[idx].coordinate;
        (lat + c.lat, lng + c.lng)
    });
    Coordinate::new(lat / n, lng / n)
}

fn build_rtree(
    graph: &UnGraph<CampusNode, PathEdge>,
    nodes: &[NodeIndex],
    projection: &LocalProjection,
) -> RTree<IndexedPoint> {
    let points = nodes
        .iter()
        .map(|&idx| {
            let p = projection.project(graph[idx].coordinate);
            IndexedPoint::new([p.x(), p.y()], idx)
        })
        .collect();
    RTree::bulk_load(points)
}
