//! GeoJSON rendering of computed routes.

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{json, Map, Value as JsonValue};

use crate::coord::Coordinate;
use crate::ports::Port;
use crate::routing::{AggregatedRoute, SegmentResult};

impl AggregatedRoute {
    /// Render the route as a GeoJSON `Feature` with a `LineString` geometry.
    ///
    /// Properties: `length`, `units`, `duration_hours`, plus
    /// `traversed_passages` when passages were requested and
    /// `port_origin`/`port_dest` when the route was snapped to ports.
    pub fn to_feature(&self) -> Feature {
        let mut properties = Map::new();
        properties.insert("length".to_string(), json!(self.length));
        properties.insert("units".to_string(), json!(self.units.as_str()));
        properties.insert("duration_hours".to_string(), json!(self.duration_hours));
        if let Some(passages) = &self.passages {
            properties.insert(
                "traversed_passages".to_string(),
                json!(passages.iter().map(|p| p.as_str()).collect::<Vec<_>>()),
            );
        }
        if let Some(ports) = &self.ports {
            properties.insert("port_origin".to_string(), port_value(&ports.origin));
            properties.insert("port_dest".to_string(), port_value(&ports.destination));
        }

        line_feature(&self.geometry, properties)
    }

    /// One feature per segment, for clients that colour legs separately.
    pub fn segment_features(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.segments.iter().map(|s| s.to_feature()).collect(),
            foreign_members: None,
        }
    }
}

impl SegmentResult {
    pub fn to_feature(&self) -> Feature {
        let mut properties = Map::new();
        properties.insert("segment".to_string(), json!(self.index));
        properties.insert("length".to_string(), json!(self.length));
        properties.insert("units".to_string(), json!(self.units.as_str()));
        properties.insert("duration_hours".to_string(), json!(self.duration_hours));
        properties.insert("reachable".to_string(), json!(self.reachable));
        line_feature(&self.geometry, properties)
    }
}

/// Collect several routes into one `FeatureCollection`.
pub fn feature_collection<'a, I>(routes: I) -> FeatureCollection
where
    I: IntoIterator<Item = &'a AggregatedRoute>,
{
    FeatureCollection {
        bbox: None,
        features: routes.into_iter().map(|r| r.to_feature()).collect(),
        foreign_members: None,
    }
}

/// Ports as `Point` features with `name`, `code` and `country` properties.
pub fn port_features<'a, I>(ports: I) -> FeatureCollection
where
    I: IntoIterator<Item = &'a Port>,
{
    let features = ports
        .into_iter()
        .map(|port| {
            let mut properties = Map::new();
            properties.insert("name".to_string(), json!(port.name));
            properties.insert("code".to_string(), json!(port.code));
            if let Some(country) = &port.country {
                properties.insert("country".to_string(), json!(country));
            }
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(port.coordinate.to_position()))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn line_feature(path: &[Coordinate], properties: Map<String, JsonValue>) -> Feature {
    let positions = path.iter().map(Coordinate::to_position).collect();
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(positions))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn port_value(port: &Port) -> JsonValue {
    json!({
        "name": port.name,
        "code": port.code,
        "coordinates": port.coordinate.to_position(),
    })
}
