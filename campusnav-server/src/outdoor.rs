//! Proxy to an OSRM-compatible street router for walks outside the campus

use campusnav_core::Coordinate;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OutdoorConfig;
use crate::error::ApiError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutdoorQuery {
    pub from_lat: Option<f64>,
    pub from_lng: Option<f64>,
    pub to_lat: Option<f64>,
    pub to_lng: Option<f64>,
}

impl OutdoorQuery {
    /// Both endpoints, or a 400 naming what is missing
    pub fn endpoints(&self) -> Result<(Coordinate, Coordinate), ApiError> {
        let point = |lat: Option<f64>, lng: Option<f64>| match (lat, lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Coordinate::new(lat, lng))
            }
            _ => None,
        };
        let from = point(self.from_lat, self.from_lng)
            .ok_or_else(|| ApiError::BadRequest("fromLat and fromLng are required".into()))?;
        let to = point(self.to_lat, self.to_lng)
            .ok_or_else(|| ApiError::BadRequest("toLat and toLng are required".into()))?;
        Ok((from, to))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutdoorRoute {
    pub path: Vec<Coordinate>,
    pub length_m: u64,
    pub duration_s: f64,
}

#[derive(Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
}

/// GeoJSON line geometry, positions as `[lng, lat]`
#[derive(Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

fn route_url(config: &OutdoorConfig, from: Coordinate, to: Coordinate) -> String {
    format!(
        "{}/route/v1/{}/{},{};{},{}",
        config.base_url.trim_end_matches('/'),
        config.profile,
        from.lng,
        from.lat,
        to.lng,
        to.lat
    )
}

/// Walking route between two points from the outdoor router
///
/// # Errors
///
/// - 503 when the router cannot be reached or times out
/// - 502 when it answers with an error or something unreadable
/// - 404 when it finds no route
pub async fn fetch_outdoor_route(
    client: &Client,
    config: &OutdoorConfig,
    from: Coordinate,
    to: Coordinate,
) -> Result<OutdoorRoute, ApiError> {
    let url = route_url(config, from, to);
    tracing::debug!(%url, "outdoor route request");

    let response = client
        .get(&url)
        .query(&[("overview", "full"), ("geometries", "geojson")])
        .send()
        .await
        .map_err(|err| {
            if err.is_connect() || err.is_timeout() {
                ApiError::Unavailable(format!("Outdoor router unavailable: {err}"))
            } else {
                ApiError::BadGateway(format!("Outdoor router request failed: {err}"))
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::BadGateway(format!(
            "Outdoor router responded {status}"
        )));
    }

    let body: OsrmResponse = response
        .json()
        .await
        .map_err(|err| ApiError::BadGateway(format!("Unreadable outdoor router response: {err}")))?;

    let Some(route) = body.routes.into_iter().next() else {
        return Err(ApiError::NotFound("No outdoor route found".into()));
    };
    if body.code != "Ok" {
        return Err(ApiError::BadGateway(format!(
            "Outdoor router returned code {}",
            body.code
        )));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let length_m = route.distance.max(0.0).round() as u64;
    Ok(OutdoorRoute {
        path: route
            .geometry
            .coordinates
            .iter()
            .map(|&[lng, lat]| Coordinate::new(lat, lng))
            .collect(),
        length_m,
        duration_s: route.duration,
    })
}
