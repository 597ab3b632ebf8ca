//! Geometry types for isolines.

use serde::{Deserialize, Serialize};

/// A vertex in the isoline's coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An ordered run of vertices, either an open line or a closed ring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    /// Vertices in drawing order.
    pub points: Vec<Point>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
}

impl Path {
    /// Create an open polyline.
    pub fn open(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// Create a closed ring.
    pub fn closed(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// Number of vertices in this path.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the path has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A contour at a single level.
///
/// Isolines handed out by the factory are always owned copies; mutating one
/// never affects the cache or any other copy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Isoline {
    /// Display name (e.g. "-200 m").
    pub name: String,
    /// The level this contour represents.
    pub level: f64,
    /// Coordinate reference system identifier (e.g. "EPSG:4326").
    pub crs: String,
    /// Contour geometry.
    pub paths: Vec<Path>,
}

impl Isoline {
    /// Create an empty isoline at the given level.
    pub fn new(name: impl Into<String>, level: f64, crs: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            crs: crs.into(),
            paths: Vec::new(),
        }
    }

    /// Builder-style helper to append a path.
    pub fn with_path(mut self, path: Path) -> Self {
        self.paths.push(path);
        self
    }

    /// Total number of vertices across all paths.
    pub fn vertex_count(&self) -> usize {
        self.paths.iter().map(Path::len).sum()
    }

    /// Returns true if the isoline has no vertices at all.
    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(Path::is_empty)
    }
}
