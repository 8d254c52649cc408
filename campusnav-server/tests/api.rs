mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{app, get, json_body, post_json};

#[tokio::test]
async fn test_route_by_alias() {
    let response = app()
        .oneshot(post_json(
            "/route",
            &json!({"fromLat": -0.00009, "fromLng": 0.0, "destinationName": "ΜΑΙΕΥΤΙΚΗΣ"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["path"][0], json!({"lat": 0.0, "lng": 0.0}));
    assert_eq!(body["lengthM"], 208);
    assert_eq!(body["path"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_route_by_query_string() {
    let response = app()
        .oneshot(get(
            "/route?fromLat=-0.00009&fromLng=0&destLat=0.0009&destLng=0.0001",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    // Ends at D, the node nearest the requested point
    let path = body["path"].as_array().unwrap();
    assert_eq!(path.last().unwrap(), &json!({"lat": 0.0009, "lng": 0.0}));
}

#[tokio::test]
async fn test_identical_requests_identical_responses() {
    let request = json!({"fromLat": -0.00009, "fromLng": 0.0, "destinationName": "library"});
    let first = json_body(app().oneshot(post_json("/route", &request)).await.unwrap()).await;
    let second = json_body(app().oneshot(post_json("/route", &request)).await.unwrap()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_start_is_bad_request() {
    let response = app()
        .oneshot(post_json("/route", &json!({"destinationName": "Library"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("fromLat"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let response = app()
        .oneshot(post_json("/route", &json!({"fromLat": "north", "fromLng": 0.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_destination_is_not_found() {
    let response = app()
        .oneshot(post_json(
            "/route",
            &json!({"fromLat": -0.00009, "fromLng": 0.0, "destinationName": "Observatory"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_far_away_user_is_unprocessable() {
    let response = app()
        .oneshot(post_json(
            "/route",
            &json!({"fromLat": 0.05, "fromLng": 0.05, "destinationName": "Library"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_stairs_only_block_wheelchair_users() {
    let walking = app()
        .oneshot(post_json(
            "/route",
            &json!({"fromLat": -0.00009, "fromLng": 0.0, "destinationName": "Library"}),
        ))
        .await
        .unwrap();
    assert_eq!(walking.status(), StatusCode::OK);

    let wheelchair = app()
        .oneshot(post_json(
            "/route",
            &json!({
                "fromLat": -0.00009,
                "fromLng": 0.0,
                "destinationName": "Library",
                "wheelchair": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(wheelchair.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_route_as_geojson() {
    let response = app()
        .oneshot(post_json(
            "/route/geojson",
            &json!({"fromLat": -0.00009, "fromLng": 0.0, "destinationName": "ΜΑΙΕΥΤΙΚΗΣ"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["type"], "Feature");
    assert_eq!(body["geometry"]["type"], "LineString");
    assert_eq!(body["properties"]["lengthM"], 208);
}

#[tokio::test]
async fn test_health_reports_graph() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["graph"]["nodes"], 7);
    assert_eq!(body["graph"]["snapCandidates"], 5);
    assert_eq!(body["graph"]["attachedPois"], 2);
    assert_eq!(body["graph"]["distantPois"], 0);
}

#[tokio::test]
async fn test_destinations_list_aliases() {
    let response = app().oneshot(get("/destinations")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!([
            {"name": "Library", "nodeId": "library"},
            {"name": "ΜΑΙΕΥΤΙΚΗΣ", "nodeId": "midwifery"}
        ])
    );
}
