use log::debug;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::entry::{find_best_start_node, find_nearest_node_id};
use super::path::{RouteOptions, RouteResult, calculate_path_with_length};
use crate::{CampusGraph, CampusModel, Coordinate, Error};

/// Routing request as it arrives over the wire.
///
/// Every field is optional at this level so that missing input surfaces as
/// a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheelchair: Option<bool>,
}

/// Where a route should end
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// A destination name, looked up in the alias table
    Name(String),
    /// Raw coordinates, snapped to the nearest candidate node
    Point(Coordinate),
    /// Name first, falling back to coordinates when the name is unknown
    Either { name: String, point: Coordinate },
}

/// Validated routing request
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub from: Coordinate,
    pub destination: Destination,
    pub options: RouteOptions,
}

impl RouteQuery {
    /// Validates the query.
    ///
    /// Fails with [`Error::InvalidData`] when the start coordinates are
    /// missing or non-finite, or when no destination is given at all.
    pub fn into_request(self) -> Result<RouteRequest, Error> {
        let from = match (self.from_lat, self.from_lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Coordinate::new(lat, lng)
            }
            _ => {
                return Err(Error::InvalidData(
                    "fromLat and fromLng are required".to_string(),
                ));
            }
        };

        let name = self
            .destination_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());
        let point = match (self.dest_lat, self.dest_lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Coordinate::new(lat, lng))
            }
            _ => None,
        };
        let destination = match (name, point) {
            (Some(name), Some(point)) => Destination::Either { name, point },
            (Some(name), None) => Destination::Name(name),
            (None, Some(point)) => Destination::Point(point),
            (None, None) => {
                return Err(Error::InvalidData(
                    "destinationName or destLat/destLng is required".to_string(),
                ));
            }
        };

        Ok(RouteRequest {
            from,
            destination,
            options: RouteOptions {
                wheelchair: self.wheelchair.unwrap_or(false),
            },
        })
    }
}

impl RouteRequest {
    pub fn new(from: Coordinate, destination: Destination, options: RouteOptions) -> Self {
        Self {
            from,
            destination,
            options,
        }
    }

    /// Builds the wire form of this request
    pub fn to_query(&self) -> RouteQuery {
        let (name, point) = match &self.destination {
            Destination::Name(name) => (Some(name.clone()), None),
            Destination::Point(point) => (None, Some(*point)),
            Destination::Either { name, point } => (Some(name.clone()), Some(*point)),
        };
        RouteQuery {
            from_lat: Some(self.from.lat),
            from_lng: Some(self.from.lng),
            destination_name: name,
            dest_lat: point.map(|p| p.lat),
            dest_lng: point.map(|p| p.lng),
            wheelchair: self.options.wheelchair.then_some(true),
        }
    }
}

/// Routing response as sent over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub path: Vec<Coordinate>,
    pub length_m: u64,
}

impl From<&RouteResult> for RouteResponse {
    fn from(result: &RouteResult) -> Self {
        Self {
            path: result.path.clone(),
            length_m: result.length_m_rounded(),
        }
    }
}

/// Resolves the destination of a request to a node of `graph`.
///
/// Names are looked up first; coordinates are used when the name is unknown
/// or absent.
pub fn resolve_destination(
    model: &CampusModel,
    graph: &CampusGraph,
    destination: &Destination,
) -> Option<NodeIndex> {
    let by_name = |name: &str| {
        let node_id = model.aliases.resolve(name)?;
        graph.node_index(node_id)
    };
    match destination {
        Destination::Name(name) => by_name(name),
        Destination::Point(point) => find_nearest_node_id(graph, *point),
        Destination::Either { name, point } => {
            by_name(name).or_else(|| find_nearest_node_id(graph, *point))
        }
    }
}

/// Computes a campus route for a validated request.
///
/// # Errors
///
/// - [`Error::DestinationNotFound`] when the destination resolves to no node
/// - [`Error::NoStartNode`] when no reachable candidate lies near the user
/// - [`Error::NoPath`] when the resolved endpoints are not connected
pub fn campus_routing(model: &CampusModel, request: &RouteRequest) -> Result<RouteResult, Error> {
    let graph = model.graph_for(request.options);

    let destination = resolve_destination(model, graph, &request.destination)
        .ok_or(Error::DestinationNotFound)?;
    let start =
        find_best_start_node(graph, request.from, destination).ok_or(Error::NoStartNode)?;

    debug!(
        "Routing {} -> {} (wheelchair: {})",
        graph.node_id(start),
        graph.node_id(destination),
        request.options.wheelchair
    );

    calculate_path_with_length(graph, start, destination).ok_or_else(|| Error::NoPath {
        from: graph.node_id(start).to_owned(),
        to: graph.node_id(destination).to_owned(),
    })
}
