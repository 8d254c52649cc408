use axum::error_handling::HandleErrorLayer;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{BoxError, Json, Router};
use campusnav_core::model::GraphStats;
use campusnav_core::{RouteQuery, RouteResponse, RouteResult, campus_routing};
use serde::Serialize;
use tower::ServiceBuilder;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::error::ApiError;
use crate::outdoor::{OutdoorQuery, OutdoorRoute, fetch_outdoor_route};
use crate::state::AppState;

/// Build the HTTP router with its middleware stack
pub fn router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .route("/route", post(route_post).get(route_get))
        .route("/route/geojson", post(route_geojson))
        .route("/outdoor-route", get(outdoor_route))
        .route("/destinations", get(destinations))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(http.request_timeout()))
                .layer(ConcurrencyLimitLayer::new(http.concurrency_limit)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Unavailable("Request timed out".into())
    } else {
        ApiError::Internal(format!("Unhandled internal error: {err}"))
    }
}

fn compute_route(state: &AppState, query: RouteQuery) -> Result<RouteResult, ApiError> {
    let request = query.into_request()?;
    let route = campus_routing(&state.model, &request)?;
    tracing::debug!(
        nodes = route.nodes.len(),
        length_m = route.length_m_rounded(),
        wheelchair = request.options.wheelchair,
        "route computed"
    );
    Ok(route)
}

async fn route_post(
    State(state): State<AppState>,
    payload: Result<Json<RouteQuery>, JsonRejection>,
) -> Result<Json<RouteResponse>, ApiError> {
    let Json(query) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let route = compute_route(&state, query)?;
    Ok(Json(RouteResponse::from(&route)))
}

async fn route_get(
    State(state): State<AppState>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<RouteResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let route = compute_route(&state, query)?;
    Ok(Json(RouteResponse::from(&route)))
}

async fn route_geojson(
    State(state): State<AppState>,
    payload: Result<Json<RouteQuery>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(query) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let route = compute_route(&state, query)?;
    Ok(Json(route.to_geojson()))
}

async fn outdoor_route(
    State(state): State<AppState>,
    query: Result<Query<OutdoorQuery>, QueryRejection>,
) -> Result<Json<OutdoorRoute>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let (from, to) = query.endpoints()?;
    let route = fetch_outdoor_route(&state.http, &state.outdoor, from, to).await?;
    Ok(Json(route))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DestinationEntry {
    name: String,
    node_id: String,
}

async fn destinations(State(state): State<AppState>) -> Json<Vec<DestinationEntry>> {
    let entries = state
        .model
        .aliases
        .entries()
        .map(|(name, node_id)| DestinationEntry {
            name: name.to_owned(),
            node_id: node_id.to_owned(),
        })
        .collect();
    Json(entries)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    graph: GraphStats,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        graph: state.model.stats(),
    })
}

/// Resolves on Ctrl-C so in-flight requests can finish
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
