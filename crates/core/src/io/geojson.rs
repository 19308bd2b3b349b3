//! GeoJSON FeatureCollection reading and writing
//!
//! Lightweight serde models covering the subset needed here: point,
//! line and polygon geometries (single and multi-part) plus flat
//! properties. Coordinates beyond x/y are ignored.

use crate::error::{Error, Result};
use crate::vector::{
    AttributeValue, CenterlineBranch, Feature, FeatureCollection, PolygonFeature, PolygonId,
    ProbeRecord,
};
use geo_types::{Coord, Geometry, LineString, MultiLineString, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

// ---------------------------------------------------------------------------
// Serde models
// ---------------------------------------------------------------------------

/// GeoJSON geometry object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point { coordinates: Vec<f64> },
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

/// GeoJSON Feature object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    pub geometry: Option<GeoJsonGeometry>,

    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// GeoJSON FeatureCollection object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonCollection {
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<GeoJsonFeature>,
}

// ---------------------------------------------------------------------------
// GeoJSON -> geo-types
// ---------------------------------------------------------------------------

fn coord(position: &[f64]) -> Result<Coord<f64>> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(Error::Other(format!(
            "GeoJSON position needs at least 2 values, got {}",
            position.len()
        ))),
    }
}

fn line_string(positions: &[Vec<f64>]) -> Result<LineString<f64>> {
    positions
        .iter()
        .map(|p| coord(p))
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|r| line_string(r));
    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => LineString::new(vec![]),
    };
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

impl GeoJsonGeometry {
    /// Convert into a `geo_types::Geometry`.
    pub fn to_geometry(&self) -> Result<Geometry<f64>> {
        Ok(match self {
            GeoJsonGeometry::Point { coordinates } => Geometry::Point(Point(coord(coordinates)?)),
            GeoJsonGeometry::LineString { coordinates } => {
                Geometry::LineString(line_string(coordinates)?)
            }
            GeoJsonGeometry::MultiLineString { coordinates } => Geometry::MultiLineString(
                MultiLineString::new(
                    coordinates
                        .iter()
                        .map(|l| line_string(l))
                        .collect::<Result<Vec<_>>>()?,
                ),
            ),
            GeoJsonGeometry::Polygon { coordinates } => Geometry::Polygon(polygon(coordinates)?),
            GeoJsonGeometry::MultiPolygon { coordinates } => Geometry::MultiPolygon(
                MultiPolygon::new(
                    coordinates
                        .iter()
                        .map(|p| polygon(p))
                        .collect::<Result<Vec<_>>>()?,
                ),
            ),
        })
    }
}

fn attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => AttributeValue::Int(i),
            None => AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => AttributeValue::String(s.clone()),
        other => AttributeValue::String(other.to_string()),
    }
}

impl GeoJsonFeature {
    /// Convert into a generic [`Feature`].
    pub fn to_feature(&self) -> Result<Feature> {
        let mut feature = match &self.geometry {
            Some(g) => Feature::new(g.to_geometry()?),
            None => Feature::empty(),
        };
        feature.id = self.id.as_ref().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        if let Some(props) = &self.properties {
            for (k, v) in props {
                feature.set_property(k.clone(), attribute(v));
            }
        }
        Ok(feature)
    }
}

/// Parse a GeoJSON FeatureCollection from a string.
pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection> {
    let raw: GeoJsonCollection = serde_json::from_str(text)?;
    collection_from_raw(raw)
}

/// Read a GeoJSON FeatureCollection from a file.
pub fn read_feature_collection<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let file = File::open(path.as_ref())?;
    let raw: GeoJsonCollection = serde_json::from_reader(BufReader::new(file))?;
    collection_from_raw(raw)
}

fn collection_from_raw(raw: GeoJsonCollection) -> Result<FeatureCollection> {
    if raw.type_ != "FeatureCollection" {
        return Err(Error::UnsupportedGeometry(format!(
            "expected a FeatureCollection, found '{}'",
            raw.type_
        )));
    }
    let mut collection = FeatureCollection::new();
    for f in &raw.features {
        collection.push(f.to_feature()?);
    }
    Ok(collection)
}

fn feature_id(feature: &Feature, index: usize, id_field: &str) -> Result<PolygonId> {
    feature.polygon_id(id_field).ok_or_else(|| Error::MissingAttribute {
        field: id_field.to_string(),
        feature: index,
    })
}

/// Extract polygons from a feature collection.
///
/// Every feature must carry a `Polygon` or `MultiPolygon` geometry and an
/// integer id in `id_field` (or in the feature `id` member). A polygon
/// with no parts or an empty exterior ring is an
/// [`Error::InvalidGeometry`]; other defects are left to the profiler,
/// which skips the polygon.
pub fn polygons_from_features(
    collection: &FeatureCollection,
    id_field: &str,
) -> Result<Vec<PolygonFeature>> {
    collection
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let id = feature_id(f, i, id_field)?;
            let feature = match &f.geometry {
                Some(Geometry::Polygon(p)) => PolygonFeature::new(id, p.clone()),
                Some(Geometry::MultiPolygon(mp)) => PolygonFeature::from_multi(id, mp.clone()),
                Some(other) => {
                    return Err(Error::UnsupportedGeometry(format!(
                        "feature {} in polygon layer is {}",
                        i,
                        geometry_name(other)
                    )))
                }
                None => {
                    return Err(Error::UnsupportedGeometry(format!(
                        "feature {} in polygon layer has no geometry",
                        i
                    )))
                }
            };
            if feature.boundary.0.is_empty() {
                return Err(Error::InvalidGeometry {
                    id,
                    reason: "multipolygon has no parts".to_string(),
                });
            }
            if let Some(part) = feature.boundary.0.iter().position(|p| p.exterior().0.is_empty()) {
                return Err(Error::InvalidGeometry {
                    id,
                    reason: format!("part {} has an empty exterior ring", part),
                });
            }
            Ok(feature)
        })
        .collect()
}

/// Extract skeleton branches from a feature collection.
///
/// Each part of a `MultiLineString` becomes its own branch, in order.
/// Features without geometry are skipped.
pub fn branches_from_features(
    collection: &FeatureCollection,
    id_field: &str,
) -> Result<Vec<CenterlineBranch>> {
    let mut branches = Vec::with_capacity(collection.len());
    for (i, f) in collection.iter().enumerate() {
        let id = feature_id(f, i, id_field)?;
        match &f.geometry {
            Some(Geometry::LineString(ls)) => branches.push(CenterlineBranch::new(id, ls.clone())),
            Some(Geometry::MultiLineString(mls)) => branches.extend(
                mls.0.iter().map(|ls| CenterlineBranch::new(id, ls.clone())),
            ),
            Some(other) => {
                return Err(Error::UnsupportedGeometry(format!(
                    "feature {} in skeleton layer is {}",
                    i,
                    geometry_name(other)
                )))
            }
            None => {}
        }
    }
    Ok(branches)
}

/// Read polygons from a GeoJSON file.
pub fn read_polygons<P: AsRef<Path>>(path: P, id_field: &str) -> Result<Vec<PolygonFeature>> {
    polygons_from_features(&read_feature_collection(path)?, id_field)
}

/// Read skeleton branches from a GeoJSON file.
pub fn read_centerlines<P: AsRef<Path>>(
    path: P,
    id_field: &str,
) -> Result<Vec<CenterlineBranch>> {
    branches_from_features(&read_feature_collection(path)?, id_field)
}

fn geometry_name(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

// ---------------------------------------------------------------------------
// geo-types -> GeoJSON
// ---------------------------------------------------------------------------

/// A selected centerline, as written by [`write_centerlines`].
#[derive(Debug, Clone)]
pub struct CenterlineFeature {
    pub polygon_id: PolygonId,
    pub geometry: LineString<f64>,
    pub length: f64,
}

fn positions(ls: &LineString<f64>) -> Vec<Vec<f64>> {
    ls.0.iter().map(|c| vec![c.x, c.y]).collect()
}

fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}

fn line_feature(geometry: Option<GeoJsonGeometry>, properties: Map<String, Value>) -> GeoJsonFeature {
    GeoJsonFeature {
        type_: "Feature".to_string(),
        id: None,
        geometry,
        properties: Some(properties),
    }
}

fn write_collection<W: Write>(writer: W, features: Vec<GeoJsonFeature>) -> Result<()> {
    let collection = GeoJsonCollection {
        type_: "FeatureCollection".to_string(),
        features,
    };
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, &collection)?;
    writer.flush()?;
    Ok(())
}

/// Write clipped probes as a GeoJSON FeatureCollection of LineStrings.
///
/// Empty probes are written with a `null` geometry so that every width
/// record keeps a matching feature.
pub fn write_probes<W: Write>(writer: W, probes: &[ProbeRecord]) -> Result<()> {
    let features = probes
        .iter()
        .map(|p| {
            let geometry = p.segment.map(|s| GeoJsonGeometry::LineString {
                coordinates: vec![vec![s.start.x, s.start.y], vec![s.end.x, s.end.y]],
            });
            let mut props = Map::new();
            props.insert("polygon_id".into(), Value::from(p.polygon_id));
            props.insert("distance".into(), number(p.distance));
            props.insert("width".into(), number(p.width));
            line_feature(geometry, props)
        })
        .collect();
    write_collection(writer, features)
}

/// Write selected centerlines with their lengths as GeoJSON.
pub fn write_centerlines<W: Write>(writer: W, centerlines: &[CenterlineFeature]) -> Result<()> {
    let features = centerlines
        .iter()
        .map(|c| {
            let mut props = Map::new();
            props.insert("polygon_id".into(), Value::from(c.polygon_id));
            props.insert("length".into(), number(c.length));
            line_feature(
                Some(GeoJsonGeometry::LineString {
                    coordinates: positions(&c.geometry),
                }),
                props,
            )
        })
        .collect();
    write_collection(writer, features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{Coord, Line};

    const POLYGONS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"polygon_id": 1, "name": "median"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0,0],[100,0],[100,10],[0,10],[0,0]]]
                }
            },
            {
                "type": "Feature",
                "id": 2,
                "properties": null,
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[0,20],[10,20],[10,30],[0,30],[0,20]]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_polygons() {
        let fc = parse_feature_collection(POLYGONS).unwrap();
        assert_eq!(fc.len(), 2);

        let polys = polygons_from_features(&fc, "polygon_id").unwrap();
        assert_eq!(polys[0].id, 1);
        assert_eq!(polys[0].boundary.0[0].exterior().0.len(), 5);
        assert_eq!(polys[1].id, 2);
        assert_eq!(polys[1].boundary.0.len(), 1);
    }

    #[test]
    fn test_properties_converted() {
        let fc = parse_feature_collection(POLYGONS).unwrap();
        let first = &fc.features[0];
        assert_eq!(
            first.get_property("name"),
            Some(&AttributeValue::String("median".into()))
        );
    }

    #[test]
    fn test_multilinestring_splits_into_branches() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"polygon_id": 3},
                "geometry": {
                    "type": "MultiLineString",
                    "coordinates": [[[0,0],[1,0]], [[0,0],[0,5,9]]]
                }
            }]
        }"#;
        let branches = branches_from_features(&parse_feature_collection(text).unwrap(), "polygon_id")
            .unwrap();
        assert_eq!(branches.len(), 2);
        assert!(branches.iter().all(|b| b.polygon_id == 3));
        assert_eq!(branches[1].geometry.0[1], Coord { x: 0.0, y: 5.0 });
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "LineString", "coordinates": [[0,0],[1,1]]}
            }]
        }"#;
        let err = branches_from_features(&parse_feature_collection(text).unwrap(), "polygon_id")
            .unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { feature: 0, .. }));
    }

    #[test]
    fn test_wrong_geometry_in_polygon_layer() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"polygon_id": 1},
                "geometry": {"type": "Point", "coordinates": [0,0]}
            }]
        }"#;
        let err = polygons_from_features(&parse_feature_collection(text).unwrap(), "polygon_id")
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedGeometry(_)));
    }

    #[test]
    fn test_empty_exterior_is_invalid_geometry() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"polygon_id": 8},
                "geometry": {"type": "Polygon", "coordinates": []}
            }]
        }"#;
        let err = polygons_from_features(&parse_feature_collection(text).unwrap(), "polygon_id")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { id: 8, .. }), "{}", err);
    }

    #[test]
    fn test_empty_multipolygon_part_is_invalid_geometry() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"polygon_id": 9},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[0,0],[1,0],[1,1],[0,0]]], []]
                }
            }]
        }"#;
        let err = polygons_from_features(&parse_feature_collection(text).unwrap(), "polygon_id")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid geometry for polygon 9: part 1 has an empty exterior ring");
    }

    #[test]
    fn test_write_probes_keeps_empty_probes() {
        let probes = vec![
            ProbeRecord {
                polygon_id: 1,
                distance: 0.0,
                width: 10.0,
                segment: Some(Line::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 10.0 })),
            },
            ProbeRecord {
                polygon_id: 1,
                distance: 0.5,
                width: 0.0,
                segment: None,
            },
        ];
        let mut buf = Vec::new();
        write_probes(&mut buf, &probes).unwrap();

        let value: Value = serde_json::from_slice(&buf).unwrap();
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["type"], "LineString");
        assert_eq!(features[0]["properties"]["width"], 10.0);
        assert!(features[1]["geometry"].is_null());
    }
}
