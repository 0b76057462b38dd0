//! On-disk network and point formats
//!
//! Networks are read from JSON or TOML (chosen by file extension):
//!
//! ```toml
//! [[nodes]]
//! id = 1
//! x = 0.0
//! y = 0.0
//!
//! [[nodes]]
//! id = 2
//! x = 100.0
//! y = 0.0
//!
//! [[edges]]
//! from = 1
//! to = 2
//! # length = 120.0   # optional; defaults to the straight-line length
//! ```
//!
//! Points are a JSON array of `{ "x": .., "y": .. }` objects.

use crate::NetworkError;
use netk_domain::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A network node as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Caller-assigned identifier
    pub id: u64,
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
}

/// A network edge as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Identifier of one end node
    pub from: u64,
    /// Identifier of the other end node
    pub to: u64,
    /// Travel length; straight-line length between the nodes when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

/// Nodes and undirected edges of a road network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    /// Network nodes
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    /// Network edges
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl NetworkDefinition {
    /// Load a definition, using TOML for `.toml` files and JSON otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            Self::from_toml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    /// Parse a JSON definition
    pub fn from_json_str(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a TOML definition
    pub fn from_toml_str(toml_str: &str) -> Result<Self, NetworkError> {
        Ok(toml::from_str(toml_str)?)
    }
}

/// A point as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
}

impl From<PointRecord> for Point {
    fn from(record: PointRecord) -> Self {
        Point::new(record.x, record.y)
    }
}

impl From<Point> for PointRecord {
    fn from(point: Point) -> Self {
        PointRecord { x: point.x, y: point.y }
    }
}

/// Read a JSON array of points
pub fn load_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point>, NetworkError> {
    let contents = fs::read_to_string(path)?;
    parse_points(&contents)
}

/// Parse a JSON array of points
pub fn parse_points(json: &str) -> Result<Vec<Point>, NetworkError> {
    let records: Vec<PointRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(Point::from).collect())
}

/// Render points as a pretty-printed JSON array
pub fn points_to_json(points: &[Point]) -> Result<String, NetworkError> {
    let records: Vec<PointRecord> = points.iter().copied().map(PointRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}
