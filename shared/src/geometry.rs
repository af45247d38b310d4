//! Region boundaries, projected once into SVG path data.

use std::fmt::Write as _;

use serde::Deserialize;
use thiserror::Error;

use crate::projection::Mercator;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid boundary JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a FeatureCollection, got {0:?}")]
    NotFeatureCollection(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: FeatureProperties,
    pub geometry: Option<FeatureGeometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub name: Option<String>,
}

/// Positions may carry altitude; only the first two values are read.
type Position = Vec<f64>;
type Ring = Vec<Position>;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

/// Points, lines and collections (label anchors, for instance) are kept as
/// raw JSON so one of them cannot sink the whole file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatureGeometry {
    Area(Geometry),
    Unsupported(serde_json::Value),
}

impl Geometry {
    fn rings(&self) -> Vec<&Ring> {
        match self {
            Self::Polygon(rings) => rings.iter().collect(),
            Self::MultiPolygon(polygons) => polygons.iter().flatten().collect(),
        }
    }
}

pub fn parse_feature_collection(json: &str) -> Result<FeatureCollection, GeometryError> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    if collection.kind != "FeatureCollection" {
        return Err(GeometryError::NotFeatureCollection(collection.kind));
    }
    Ok(collection)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionShape {
    pub name: String,
    /// SVG path data in map-frame pixels.
    pub path: String,
}

/// Project every feature once. Features without a name or an area geometry,
/// and rings with a point outside the projection, are left out.
pub fn build_region_shapes(collection: &FeatureCollection, projection: &Mercator) -> Vec<RegionShape> {
    let mut shapes = Vec::with_capacity(collection.features.len());
    for feature in &collection.features {
        let (Some(name), Some(geometry)) = (&feature.properties.name, &feature.geometry) else {
            continue;
        };
        let geometry = match geometry {
            FeatureGeometry::Area(geometry) => geometry,
            FeatureGeometry::Unsupported(raw) => {
                let kind = raw.get("type").and_then(|t| t.as_str()).unwrap_or("unknown");
                tracing::warn!(region = %name, kind, "skipping feature without area geometry");
                continue;
            }
        };
        let mut path = String::new();
        for ring in geometry.rings() {
            match ring_path(ring, projection) {
                Some(d) => path.push_str(&d),
                None => tracing::warn!(region = %name, "skipping unprojectable ring"),
            }
        }
        if !path.is_empty() {
            shapes.push(RegionShape {
                name: name.clone(),
                path,
            });
        }
    }
    shapes
}

fn ring_path(ring: &Ring, projection: &Mercator) -> Option<String> {
    if ring.len() < 3 {
        return None;
    }
    let mut d = String::with_capacity(ring.len() * 14);
    for (i, position) in ring.iter().enumerate() {
        let (&lon, &lat) = (position.first()?, position.get(1)?);
        let [x, y] = projection.project([lon, lat])?;
        let command = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{command}{:.1},{:.1}", round_tenth(x), round_tenth(y));
    }
    d.push('Z');
    Some(d)
}

fn round_tenth(v: f64) -> f64 {
    let r = (v * 10.0).round() / 10.0;
    if r == 0.0 { 0.0 } else { r }
}

/// Shapes keyed by region name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionShapes {
    shapes: Vec<RegionShape>,
}

impl From<Vec<RegionShape>> for RegionShapes {
    fn from(shapes: Vec<RegionShape>) -> Self {
        Self { shapes }
    }
}

impl RegionShapes {
    pub fn contains(&self, name: &str) -> bool {
        self.shapes.iter().any(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionShape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
