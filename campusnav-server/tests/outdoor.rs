mod common;

use axum::http::StatusCode;
use campusnav_server::config::OutdoorConfig;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{app_with_outdoor, get, json_body};

const ROUTE_PATH: &str = "/route/v1/foot/22.95,40.63;22.96,40.64";
const QUERY: &str = "/outdoor-route?fromLat=40.63&fromLng=22.95&toLat=40.64&toLng=22.96";

fn outdoor(server: &MockServer) -> OutdoorConfig {
    OutdoorConfig {
        base_url: server.uri(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_outdoor_route_translates_geometry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .and(query_param("geometries", "geojson"))
        .and(query_param("overview", "full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [{
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[22.95, 40.63], [22.955, 40.635], [22.96, 40.64]]
                },
                "distance": 1402.6,
                "duration": 1010.0
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app_with_outdoor(outdoor(&server))
        .oneshot(get(QUERY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["lengthM"], 1403);
    assert_eq!(body["durationS"], 1010.0);
    assert_eq!(body["path"][0], json!({"lat": 40.63, "lng": 22.95}));
    assert_eq!(body["path"][1], json!({"lat": 40.635, "lng": 22.955}));
}

#[tokio::test]
async fn test_outdoor_router_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = app_with_outdoor(outdoor(&server))
        .oneshot(get(QUERY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_outdoor_no_route_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": "NoRoute", "routes": []})),
        )
        .mount(&server)
        .await;

    let response = app_with_outdoor(outdoor(&server))
        .oneshot(get(QUERY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_outdoor_router_is_unavailable() {
    let config = OutdoorConfig {
        base_url: "http://127.0.0.1:1".into(),
        ..Default::default()
    };
    let response = app_with_outdoor(config).oneshot(get(QUERY)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_missing_destination_is_bad_request() {
    let server = MockServer::start().await;
    let response = app_with_outdoor(outdoor(&server))
        .oneshot(get("/outdoor-route?fromLat=40.63&fromLng=22.95"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("toLat"));
}
