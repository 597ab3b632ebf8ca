//! Douglas–Peucker decimation.
//!
//! Bathymetric contours extracted from a dense grid carry far more vertices
//! than a display needs. [`SimplifyingSource`] wraps another source and drops
//! every vertex closer than `tolerance` to the simplified line, recording how
//! many vertices were kept.

use crate::isoline::{Path, Point};

use super::{ExtractedIsoline, IsolineSource, SourceError};

/// Fewest vertices a closed ring keeps after simplification.
const MIN_RING_VERTICES: usize = 3;

/// Simplify one path.
///
/// Open paths always keep both end points. Closed rings are anchored at their
/// first vertex and never shrink below three vertices.
pub fn simplify_path(path: &Path, tolerance: f64) -> Path {
    if tolerance <= 0.0 || path.points.len() <= 2 {
        return path.clone();
    }

    if !path.closed {
        return Path::open(douglas_peucker(&path.points, tolerance));
    }

    // Close the ring explicitly so the wrap-around edge is simplified too
    let mut ring = path.points.clone();
    ring.push(path.points[0]);
    let mut kept = douglas_peucker(&ring, tolerance);
    kept.pop();

    if kept.len() < MIN_RING_VERTICES {
        return path.clone();
    }
    Path::closed(kept)
}

fn douglas_peucker(points: &[Point], tolerance: f64) -> Vec<Point> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0, n - 1)];
    while let Some((first, last)) = stack.pop() {
        let mut max_distance = 0.0;
        let mut farthest = first;
        for (i, point) in points.iter().enumerate().take(last).skip(first + 1) {
            let distance = segment_distance(*point, points[first], points[last]);
            if distance > max_distance {
                max_distance = distance;
                farthest = i;
            }
        }
        if max_distance > tolerance {
            keep[farthest] = true;
            stack.push((first, farthest));
            stack.push((farthest, last));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(*point))
        .collect()
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    (p.x - (a.x + t * dx)).hypot(p.y - (a.y + t * dy))
}

/// Source decorator applying [`simplify_path`] to every isoline.
pub struct SimplifyingSource<S> {
    inner: S,
    tolerance: f64,
}

impl<S: IsolineSource> SimplifyingSource<S> {
    /// Wrap `inner`, removing detail below `tolerance` (in CRS units).
    pub fn new(inner: S, tolerance: f64) -> Result<Self, SourceError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(SourceError::Invalid(format!(
                "simplification tolerance must be a non-negative number, got {}",
                tolerance
            )));
        }
        Ok(Self { inner, tolerance })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl<S: IsolineSource> IsolineSource for SimplifyingSource<S> {
    fn describe(&self) -> String {
        format!(
            "{} (simplified, tolerance {})",
            self.inner.describe(),
            self.tolerance
        )
    }

    fn read_all(&mut self) -> Result<Vec<ExtractedIsoline>, SourceError> {
        let extracted = self.inner.read_all()?;
        Ok(extracted
            .into_iter()
            .map(|mut item| {
                let before = item.isoline.vertex_count();
                item.isoline.paths = item
                    .isoline
                    .paths
                    .iter()
                    .map(|path| simplify_path(path, self.tolerance))
                    .collect();
                let after = item.isoline.vertex_count();
                if after > 0 {
                    item.decimation_ratio *= before as f64 / after as f64;
                }
                item
            })
            .collect())
    }
}
