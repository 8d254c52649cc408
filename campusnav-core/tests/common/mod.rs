#![allow(dead_code)]

use campusnav_core::loading::{AccessRule, EdgeSplit, NodeTable, PoiTable};
use campusnav_core::{CampusGraphConfig, CampusModel, Coordinate, GraphSources, create_campus_model};

/// A small campus near the equator, where 0.0009° is about 100 m.
///
/// ```text
///                 E -- library            (C-E are stairs)
///                 |
///   D ----------- C  midwifery
///   |          /  |
///   |        M    BC_mid                  (B-C split through BC_mid)
///   |     /       |
///   A ----------- B ---- far              (far lies outside the campus)
///   A_dup -- F                            (A_dup is 5 m from A)
///
///   island1 -- island2                    (disconnected)
/// ```
pub fn campus_sources() -> GraphSources {
    let mut network = NodeTable::default();
    for (id, lat, lng) in [
        ("A", 0.0, 0.0),
        ("B", 0.0, 0.0009),
        ("C", 0.0009, 0.0009),
        ("D", 0.0009, 0.0),
        ("BC_mid", 0.00045, 0.0009),
        ("E", 0.0018, 0.0009),
        ("A_dup", 0.00003, 0.00003),
        ("F", 0.00003, -0.0009),
        ("island1", 0.003, 0.003),
        ("island2", 0.003, 0.0031),
        ("far", 0.01, 0.01),
    ] {
        network.nodes.insert(id.to_string(), Coordinate::new(lat, lng));
    }
    for (a, b) in [
        ("A", "B"),
        ("B", "C"),
        ("C", "D"),
        ("D", "A"),
        ("C", "E"),
        ("A_dup", "F"),
        ("island1", "island2"),
        ("B", "far"),
    ] {
        network.edges.push((a.to_string(), b.to_string()));
    }

    let mut manual = NodeTable::default();
    manual
        .nodes
        .insert("M".to_string(), Coordinate::new(0.00045, 0.00045));
    for (a, b) in [("A", "M"), ("M", "C"), ("M", "ghost")] {
        manual.edges.push((a.to_string(), b.to_string()));
    }

    let mut pois = PoiTable::default();
    pois.nodes
        .insert("midwifery".to_string(), Coordinate::new(0.00095, 0.00095));
    pois.nodes
        .insert("library".to_string(), Coordinate::new(0.0018, 0.00095));
    for (name, id) in [
        ("ΜΑΙΕΥΤΙΚΗΣ", "midwifery"),
        ("Library", "library"),
        ("Ghost Hall", "nowhere"),
    ] {
        pois.aliases.insert(name.to_string(), id.to_string());
    }

    GraphSources {
        network,
        manual,
        pois,
    }
}

pub fn campus_config() -> CampusGraphConfig {
    CampusGraphConfig {
        edge_splits: vec![EdgeSplit {
            from: "B".to_string(),
            to: "C".to_string(),
            via: vec!["BC_mid".to_string()],
        }],
        access_tags: vec![AccessRule::stairs("C", "E")],
        ..Default::default()
    }
}

pub fn campus() -> CampusModel {
    create_campus_model(&campus_config(), &campus_sources())
}

/// Ten meters south of node A
pub fn near_a() -> Coordinate {
    Coordinate::new(-0.00009, 0.0)
}
