mod common;

use campusnav_core::algo::haversine_m;
use campusnav_core::model::AccessTag;
use campusnav_core::routing::dijkstra::dijkstra_path_weights;
use campusnav_core::routing::find_best_start_node;
use campusnav_core::{CampusGraphConfig, Coordinate, START_SEARCH_RADIUS_M, create_campus_model};

use common::{campus, campus_config, campus_sources, near_a};

#[test]
fn test_network_outside_campus_is_clipped() {
    let model = campus();
    let g = &model.graph;
    assert!(g.node_index("far").is_none());
    let b = g.node_index("B").unwrap();
    assert!(g.neighbors(b).all(|(n, _)| g.node_id(n) != "far"));
}

#[test]
fn test_near_duplicates_are_healed() {
    let model = campus();
    let g = &model.graph;
    let a = g.node_index("A").unwrap();
    let a_dup = g.node_index("A_dup").unwrap();
    assert_eq!(g.edge_weight(a, a_dup), Some(5));
    assert_eq!(model.meta.healed_edges, 1);
    assert!(g.is_snap_candidate(g.node_index("F").unwrap()));
}

#[test]
fn test_edge_split_replaces_direct_edge() {
    let model = campus();
    let g = &model.graph;
    let b = g.node_index("B").unwrap();
    let c = g.node_index("C").unwrap();
    let mid = g.node_index("BC_mid").unwrap();
    assert_eq!(g.edge_weight(b, c), None);
    assert_eq!(g.edge_weight(b, mid), Some(50));
    assert_eq!(g.edge_weight(mid, c), Some(50));
}

#[test]
fn test_only_largest_component_is_snappable() {
    let model = campus();
    let g = &model.graph;
    assert_eq!(model.meta.components, 2);
    for id in ["island1", "island2", "midwifery", "library"] {
        let idx = g.node_index(id).unwrap();
        assert!(!g.is_snap_candidate(idx), "{id} must not be a snap candidate");
    }
    assert_eq!(g.snap_candidates().len(), 9);
}

#[test]
fn test_pois_attach_to_nearest_candidate() {
    let model = campus();
    let g = &model.graph;
    let midwifery = g.node_index("midwifery").unwrap();
    let neighbors: Vec<_> = g.neighbors(midwifery).map(|(n, _)| g.node_id(n)).collect();
    assert_eq!(neighbors, vec!["C"]);
    assert_eq!(model.meta.attached_pois, 2);
    assert!(model.meta.unattached_pois.is_empty());
}

#[test]
fn test_far_entrances_are_attached_and_reported() {
    // midwifery sits about 7.9 m from C, library about 5.6 m from E
    let config = CampusGraphConfig {
        poi_warning_distance_m: 7.0,
        ..campus_config()
    };
    let model = create_campus_model(&config, &campus_sources());
    assert_eq!(model.meta.distant_pois, vec!["midwifery".to_string()]);
    assert_eq!(model.meta.attached_pois, 2);

    let stats = model.stats();
    assert_eq!(stats.distant_pois, 1);
    assert_eq!(stats.unattached_pois, 0);
    assert_eq!(campus().stats().distant_pois, 0);
}

#[test]
fn test_unknown_alias_targets_are_dropped() {
    let model = campus();
    assert_eq!(model.aliases.resolve("Ghost Hall"), None);
    assert_eq!(model.aliases.resolve("library"), Some("library"));
    assert_eq!(model.stats().destinations, 2);
}

#[test]
fn test_snap_candidates_are_mutually_reachable() {
    let model = campus();
    let g = &model.graph;
    for &from in g.snap_candidates() {
        let reached = dijkstra_path_weights(g, from);
        for &to in g.snap_candidates() {
            assert!(
                reached.contains_key(&to),
                "{} cannot reach {}",
                g.node_id(from),
                g.node_id(to)
            );
        }
    }
}

#[test]
fn test_weights_are_positive_and_symmetric() {
    let model = campus();
    let g = &model.graph;
    for (a, b, edge) in g.edges() {
        assert!(edge.weight >= 1);
        assert_eq!(g.edge_weight(a, b), g.edge_weight(b, a));
        let expected = haversine_m(g.coordinate(a), g.coordinate(b)).round().max(1.0);
        assert!((f64::from(edge.weight) - expected).abs() < f64::EPSILON);
    }
}

#[test]
fn test_shortest_paths_satisfy_triangle_inequality() {
    let model = campus();
    let g = &model.graph;
    let nodes = g.snap_candidates();
    let tables: Vec<_> = nodes
        .iter()
        .map(|&n| dijkstra_path_weights(g, n))
        .collect();
    for (i, _) in nodes.iter().enumerate() {
        for (j, b) in nodes.iter().enumerate() {
            for c in nodes {
                let ac = tables[i][c];
                let ab = tables[i][b];
                let bc = tables[j][c];
                assert!(ac <= ab + bc);
            }
        }
    }
}

#[test]
fn test_wheelchair_graph_is_stair_free_subgraph() {
    let model = campus();
    let base = &model.graph;
    let wheelchair = model.wheelchair_graph();

    assert_eq!(wheelchair.node_count(), base.node_count());
    assert_eq!(wheelchair.edge_count(), base.edge_count() - 1);
    for (a, b, edge) in wheelchair.edges() {
        assert_ne!(edge.access, AccessTag::Stairs);
        assert_eq!(base.edge_weight(a, b), Some(edge.weight));
    }

    let c = base.node_index("C").unwrap();
    let e = base.node_index("E").unwrap();
    assert_eq!(base.node(c).id, wheelchair.node(c).id);
    assert!(base.edge_weight(c, e).is_some());
    assert!(wheelchair.edge_weight(c, e).is_none());

    // Derived once
    assert!(std::ptr::eq(wheelchair, model.wheelchair_graph()));
}

#[test]
fn test_best_start_never_exceeds_search_radius() {
    let model = campus();
    let g = &model.graph;
    let destination = g.node_index("midwifery").unwrap();
    let origin = near_a();

    for step_lat in -6..=6 {
        for step_lng in -6..=6 {
            let user = Coordinate::new(
                origin.lat + f64::from(step_lat) * 0.0003,
                origin.lng + f64::from(step_lng) * 0.0003,
            );
            if let Some(start) = find_best_start_node(g, user, destination) {
                assert!(haversine_m(user, g.coordinate(start)) <= START_SEARCH_RADIUS_M);
            }
        }
    }
}
