#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response};
use campusnav_core::loading::{AccessRule, NodeTable, PoiTable};
use campusnav_core::{CampusGraphConfig, Coordinate, GraphSources, create_campus_model};
use campusnav_server::config::{HttpConfig, OutdoorConfig};
use campusnav_server::{AppState, router};
use serde_json::Value;

/// A 100 m square A-B-C-D with stairs from C up to E.
/// The midwifery entrance hangs off C, the library entrance off E.
pub fn campus_sources() -> GraphSources {
    let mut network = NodeTable::default();
    for (id, lat, lng) in [
        ("A", 0.0, 0.0),
        ("B", 0.0, 0.0009),
        ("C", 0.0009, 0.0009),
        ("D", 0.0009, 0.0),
        ("E", 0.0018, 0.0009),
    ] {
        network.nodes.insert(id.to_string(), Coordinate::new(lat, lng));
    }
    for (a, b) in [("A", "B"), ("B", "C"), ("C", "D"), ("D", "A"), ("C", "E")] {
        network.edges.push((a.to_string(), b.to_string()));
    }

    let mut pois = PoiTable::default();
    pois.nodes
        .insert("midwifery".to_string(), Coordinate::new(0.00095, 0.00095));
    pois.nodes
        .insert("library".to_string(), Coordinate::new(0.0018, 0.00095));
    pois.aliases
        .insert("ΜΑΙΕΥΤΙΚΗΣ".to_string(), "midwifery".to_string());
    pois.aliases
        .insert("Library".to_string(), "library".to_string());

    GraphSources {
        network,
        pois,
        ..Default::default()
    }
}

pub fn app_with_outdoor(outdoor: OutdoorConfig) -> Router {
    let config = CampusGraphConfig {
        access_tags: vec![AccessRule::stairs("C", "E")],
        ..Default::default()
    };
    let model = Arc::new(create_campus_model(&config, &campus_sources()));
    let state = AppState::new(model, outdoor).unwrap();
    router(state, &HttpConfig::default())
}

pub fn app() -> Router {
    app_with_outdoor(OutdoorConfig::default())
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
