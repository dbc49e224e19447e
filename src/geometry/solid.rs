//! Closed triangle-mesh solids and their intersection with lines.
//!
//! Line/face crossings use the Möller–Trumbore test without restricting the
//! sign of the line parameter. Crossings closer than [`MERGE_TOLERANCE`] are
//! merged so a line through a shared edge or vertex is counted once; inside
//! intervals are then recovered by crossing parity.

use super::{GeometryError, Line};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Distance (model units) under which two crossings are the same crossing.
pub const MERGE_TOLERANCE: f64 = 1e-9;

/// Slack on barycentric coordinates so edge hits are never lost between faces.
const BARYCENTRIC_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    vertices: Vec<Point3<f64>>,
    triangles: Vec<[usize; 3]>,
}

/// Segments of a curve that lie inside a solid, ordered along the curve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolidCurveIntersection {
    segments: Vec<Line>,
}

impl SolidCurveIntersection {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment(&self, index: usize) -> Option<&Line> {
        self.segments.get(index)
    }

    pub fn segments(&self) -> &[Line] {
        &self.segments
    }
}

impl Solid {
    pub fn new(vertices: Vec<Point3<f64>>, triangles: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Axis-aligned box between two opposite corners.
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>) -> Self {
        let base = [
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
        ];
        Self::prism(base, Vector3::new(0.0, 0.0, max.z - min.z))
    }

    /// Quadrilateral `base` swept along `extrusion`.
    pub fn prism(base: [Point3<f64>; 4], extrusion: Vector3<f64>) -> Self {
        let mut vertices = base.to_vec();
        vertices.extend(base.iter().map(|p| p + extrusion));

        let mut triangles = Vec::with_capacity(12);
        let mut quad = |a: usize, b: usize, c: usize, d: usize| {
            triangles.push([a, b, c]);
            triangles.push([a, c, d]);
        };

        quad(0, 3, 2, 1);
        quad(4, 5, 6, 7);
        for i in 0..4 {
            let j = (i + 1) % 4;
            quad(i, j, j + 4, i + 4);
        }

        Self::new(vertices, triangles)
    }

    /// Several disjoint closed shells treated as one body.
    pub fn compound(parts: &[Solid]) -> Self {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for part in parts {
            let offset = vertices.len();
            vertices.extend_from_slice(&part.vertices);
            triangles.extend(
                part.triangles
                    .iter()
                    .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
            );
        }
        Self::new(vertices, triangles)
    }

    /// Straight wall of the given thickness centred on `baseline`, extruded upward.
    pub fn wall(baseline: &Line, thickness: f64, height: f64) -> Self {
        let along = baseline.end() - baseline.start();
        let plan = Vector3::new(along.x, along.y, 0.0);
        let normal = if plan.norm() < f64::EPSILON {
            Vector3::x()
        } else {
            Vector3::new(-plan.y, plan.x, 0.0).normalize()
        };
        let half = normal * (thickness / 2.0);

        let base = [
            baseline.start() - half,
            baseline.end() - half,
            baseline.end() + half,
            baseline.start() + half,
        ];
        Self::prism(base, Vector3::new(0.0, 0.0, height))
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.triangles.is_empty() {
            return Err(GeometryError::EmptySolid);
        }
        if self.vertices.iter().any(|v| v.iter().any(|c| !c.is_finite())) {
            return Err(GeometryError::NonFiniteCoordinate { what: "solid" });
        }
        for (face, triangle) in self.triangles.iter().enumerate() {
            if let Some(&index) = triangle.iter().find(|&&i| i >= self.vertices.len()) {
                return Err(GeometryError::InvalidFaceIndex {
                    face,
                    index,
                    vertex_count: self.vertices.len(),
                });
            }
        }
        Ok(())
    }

    /// Distances along a ray at which it crosses the solid boundary, nearest first.
    ///
    /// `direction` need not be normalized; distances are measured in model units.
    /// An invalid solid or a zero direction yields no hits.
    pub fn ray_hits(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Vec<f64> {
        let norm = direction.norm();
        if norm < f64::EPSILON || self.validate().is_err() {
            return Vec::new();
        }
        let unit = direction / norm;

        self.crossings(origin, &unit)
            .into_iter()
            .filter(|t| *t >= -MERGE_TOLERANCE)
            .map(|t| t.max(0.0))
            .collect()
    }

    /// Portions of `curve` inside the solid.
    pub fn intersect_with_curve(&self, curve: &Line) -> Result<SolidCurveIntersection, GeometryError> {
        self.validate()?;
        if !curve.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate { what: "curve" });
        }
        if curve.is_degenerate() {
            return Err(GeometryError::DegenerateCurve);
        }

        let origin = curve.start();
        let direction = curve.direction();
        let length = curve.length();

        let crossings = self.crossings(&origin, &direction);
        if crossings.len() % 2 != 0 {
            return Err(GeometryError::OpenSolid {
                crossings: crossings.len(),
            });
        }

        let segments = crossings
            .chunks_exact(2)
            .filter_map(|pair| {
                let enter = pair[0].max(0.0);
                let exit = pair[1].min(length);
                (exit - enter > MERGE_TOLERANCE).then(|| {
                    Line::new(origin + direction * enter, origin + direction * exit)
                })
            })
            .collect();

        Ok(SolidCurveIntersection { segments })
    }

    /// Signed distances along the infinite line through `origin` with unit
    /// `direction`, sorted and merged.
    fn crossings(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Vec<f64> {
        let mut hits: Vec<f64> = self
            .triangles
            .iter()
            .filter_map(|[a, b, c]| {
                line_triangle_intersect(
                    origin,
                    direction,
                    &self.vertices[*a],
                    &self.vertices[*b],
                    &self.vertices[*c],
                )
            })
            .collect();

        hits.sort_by(f64::total_cmp);
        hits.dedup_by(|later, earlier| (*later - *earlier).abs() <= MERGE_TOLERANCE);
        hits
    }
}

/// Möller–Trumbore against the full line (both directions from `origin`).
fn line_triangle_intersect(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Line is parallel to the face (or the face is degenerate)
    let scale = edge1.norm() * edge2.norm();
    if a.abs() <= 1e-12 * scale.max(f64::MIN_POSITIVE) {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(-BARYCENTRIC_SLACK..=1.0 + BARYCENTRIC_SLACK).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);
    if v < -BARYCENTRIC_SLACK || u + v > 1.0 + BARYCENTRIC_SLACK {
        return None;
    }

    Some(f * edge2.dot(&q))
}
