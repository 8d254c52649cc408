use std::collections::BinaryHeap;

use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

use super::state::State;
use crate::{Meters, model::CampusGraph};

/// Dijkstra's algorithm with predecessor tracking
///
/// Returns the node sequence from `start` to `end` inclusive, or `None` when
/// `end` is unreachable. Equal-cost alternatives resolve the same way on
/// every call for the same graph.
pub fn shortest_path(graph: &CampusGraph, start: NodeIndex, end: NodeIndex) -> Option<Vec<NodeIndex>> {
    // Estimate capacity based on graph size
    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, Meters> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    heap.push(State {
        cost: 0,
        node: start,
    });
    distances.insert(start, 0);

    let mut reached = false;
    while let Some(State { cost, node }) = heap.pop() {
        if node == end {
            reached = true;
            break;
        }

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
                    predecessors.insert(next, node);
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, node);
                    }
                }
            }
        }
    }

    if !reached {
        return None;
    }

    // Follow predecessors backward from end to start
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        current = *predecessors.get(&current)?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}
