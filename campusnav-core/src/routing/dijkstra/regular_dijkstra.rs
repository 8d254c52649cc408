use std::collections::BinaryHeap;

use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

use super::state::State;
use crate::{Meters, model::CampusGraph};

/// Dijkstra's algorithm over the walking graph
/// Returns a map of reached node indices to path lengths in meters
pub fn dijkstra_path_weights(graph: &CampusGraph, start: NodeIndex) -> HashMap<NodeIndex, Meters> {
    let mut distances: HashMap<NodeIndex, Meters> = HashMap::new();
    let mut heap = BinaryHeap::new();

    // Start node has distance 0
    heap.push(State {
        cost: 0,
        node: start,
    });
    distances.insert(start, 0);

    while let Some(State { cost, node }) = heap.pop() {
        // Skip if we've found a better path
        if distances.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        for (next, weight) in graph.neighbors(node) {
            let next_cost = cost.saturating_add(weight);

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{GraphSources, NodeTable};
    use crate::{CampusGraphConfig, Coordinate, create_campus_model};

    #[test]
    fn test_distances_from_line_end() {
        let mut network = NodeTable::default();
        for (id, lng) in [("a", 0.0), ("b", 0.0009), ("c", 0.0018)] {
            network.nodes.insert(id.to_string(), Coordinate::new(0.0, lng));
        }
        network.nodes.insert("lone".to_string(), Coordinate::new(0.005, 0.005));
        for (a, b) in [("a", "b"), ("b", "c")] {
            network.edges.push((a.to_string(), b.to_string()));
        }
        let sources = GraphSources {
            network,
            ..Default::default()
        };
        let model = create_campus_model(&CampusGraphConfig::default(), &sources);
        let graph = &model.graph;
        let idx = |id: &str| graph.node_index(id).unwrap();

        let distances = dijkstra_path_weights(graph, idx("a"));
        assert_eq!(distances[&idx("a")], 0);
        assert_eq!(distances[&idx("b")], 100);
        assert_eq!(distances[&idx("c")], 200);
        assert!(!distances.contains_key(&idx("lone")));
    }
}
