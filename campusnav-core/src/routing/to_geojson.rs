use geo::{Coord, LineString};
use geojson::{Feature, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::Error;

use super::RouteResult;

impl RouteResult {
    /// Converts the route to a `GeoJSON` `LineString` feature.
    ///
    /// Properties carry the rounded length and the node ids along the route.
    pub fn to_geojson(&self) -> Feature {
        let line: LineString<f64> = self.path.iter().map(|&c| Coord::from(c)).collect();

        let properties = json!({
            "lengthM": self.length_m_rounded(),
            "nodes": self.nodes,
        });

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoJsonValue::from(&line))),
            id: None,
            properties: properties.as_object().cloned(),
            foreign_members: None,
        }
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()).map_err(Error::from)
    }
}
