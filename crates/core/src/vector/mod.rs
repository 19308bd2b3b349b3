//! Vector records consumed and produced by the width-profiling engine
//!
//! - `Feature` / `FeatureCollection`: generic geometry + attributes, as read from a layer
//! - `PolygonFeature`: a polygon with its stable id
//! - `CenterlineBranch`: one skeleton branch belonging to a polygon
//! - `SamplePoint`, `WidthRecord`, `ProbeRecord`: engine outputs

use geo_types::{Coord, Geometry, Line, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable polygon identifier, unique across a batch.
pub type PolygonId = i64;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Interpret the value as an integer id.
    ///
    /// Floats are accepted only when they carry an exact integer, and
    /// strings only when they parse as one.
    pub fn as_id(&self) -> Option<PolygonId> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            AttributeValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            AttributeValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
    /// Optional feature ID
    pub id: Option<String>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Create a feature with no geometry
    pub fn empty() -> Self {
        Self {
            geometry: None,
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }

    /// Resolve the polygon id from `field`, falling back to the feature id.
    pub fn polygon_id(&self, field: &str) -> Option<PolygonId> {
        self.get_property(field)
            .and_then(AttributeValue::as_id)
            .or_else(|| self.id.as_deref().and_then(|s| s.trim().parse().ok()))
    }
}

/// Collection of features
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self { features: Vec::new() }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

/// A polygon to be profiled.
///
/// The boundary is stored as a `MultiPolygon` so that layers with
/// multi-part features can be read without loss; most inputs carry a
/// single part.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    pub id: PolygonId,
    pub boundary: MultiPolygon<f64>,
}

impl PolygonFeature {
    pub fn new(id: PolygonId, polygon: Polygon<f64>) -> Self {
        Self {
            id,
            boundary: MultiPolygon::new(vec![polygon]),
        }
    }

    pub fn from_multi(id: PolygonId, boundary: MultiPolygon<f64>) -> Self {
        Self { id, boundary }
    }
}

/// One candidate skeleton branch for a polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterlineBranch {
    pub polygon_id: PolygonId,
    pub geometry: LineString<f64>,
}

impl CenterlineBranch {
    pub fn new(polygon_id: PolygonId, geometry: LineString<f64>) -> Self {
        Self { polygon_id, geometry }
    }
}

/// A point on a centerline at a cumulative arc-length distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub polygon_id: PolygonId,
    pub position: Coord<f64>,
    /// Arc length from the centerline start
    pub distance: f64,
}

/// One row of the width profile table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthRecord {
    pub polygon_id: PolygonId,
    pub distance: f64,
    /// Zero when the probe did not intersect the polygon
    pub width: f64,
}

/// A width record together with the clipped probe that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRecord {
    pub polygon_id: PolygonId,
    pub distance: f64,
    pub width: f64,
    /// `None` for an empty intersection
    pub segment: Option<Line<f64>>,
}

impl ProbeRecord {
    pub fn record(&self) -> WidthRecord {
        WidthRecord {
            polygon_id: self.polygon_id,
            distance: self.distance,
            width: self.width,
        }
    }
}
