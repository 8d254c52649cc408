#![allow(dead_code)]

use std::sync::Arc;

use campusnav::PositionFix;
use campusnav::campusnav_core::loading::{NodeTable, PoiTable};
use campusnav::campusnav_core::{
    CampusGraphConfig, CampusModel, Coordinate, Destination, GraphSources, RouteOptions,
    RouteRequest, create_campus_model,
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// Degrees of latitude per meter, near enough
pub const M: f64 = 0.000_009;

/// Five path nodes 55 m apart along the equator, with a hall entrance
/// just past the last one.
pub fn corridor() -> Arc<CampusModel> {
    let mut network = NodeTable::default();
    for i in 0..5 {
        network.nodes.insert(
            format!("n{i}"),
            Coordinate::new(0.0, f64::from(i) * 0.0005),
        );
        if i > 0 {
            network.edges.push((format!("n{}", i - 1), format!("n{i}")));
        }
    }
    let mut pois = PoiTable::default();
    pois.nodes
        .insert("hall".to_string(), Coordinate::new(0.00005, 0.00205));
    pois.aliases.insert("Hall".to_string(), "hall".to_string());

    Arc::new(create_campus_model(
        &CampusGraphConfig::default(),
        &GraphSources {
            network,
            pois,
            ..Default::default()
        },
    ))
}

pub fn to_hall(from: Coordinate) -> RouteRequest {
    RouteRequest::new(from, Destination::Name("Hall".into()), RouteOptions::default())
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + TimeDelta::seconds(secs)
}

/// A walking-speed fix `meters_north` of the corridor
pub fn fix(meters_north: f64, lng: f64, secs: i64) -> PositionFix {
    PositionFix::new(Coordinate::new(meters_north * M, lng), 5.0, at(secs)).with_speed(1.2)
}
