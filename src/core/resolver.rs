//! Exact penetration geometry for one (conduit, host) candidate.

use crate::core::adapter;
use crate::core::orientation::is_perpendicular;
use crate::domain::model::{Conduit, ElementId, PenetrationResult, StructuralElement};
use crate::geometry::{GeometryError, Line};
use std::fmt;

/// Why a candidate produced no penetration. None of these abort a run.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    HostNotFound(ElementId),
    NotPerpendicular { angle: f64 },
    NoSolid,
    IntersectionFailed(GeometryError),
    NoSegments,
}

impl SkipReason {
    /// Short stable label used for run statistics.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::HostNotFound(_) => "host_not_found",
            SkipReason::NotPerpendicular { .. } => "not_perpendicular",
            SkipReason::NoSolid => "no_solid",
            SkipReason::IntersectionFailed(_) => "intersection_failed",
            SkipReason::NoSegments => "no_segments",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::HostNotFound(id) => write!(f, "host {} not found", id),
            SkipReason::NotPerpendicular { angle } => {
                write!(f, "host axis not perpendicular ({:.4} rad)", angle)
            }
            SkipReason::NoSolid => write!(f, "host has no solid"),
            SkipReason::IntersectionFailed(err) => write!(f, "intersection failed: {}", err),
            SkipReason::NoSegments => write!(f, "conduit does not pass through the solid"),
        }
    }
}

pub type Resolution = Result<PenetrationResult, SkipReason>;

pub struct IntersectionResolver {
    clearance: f64,
}

impl IntersectionResolver {
    /// `clearance` is added to the conduit's outer diameter, in model units.
    pub fn new(clearance: f64) -> Self {
        Self { clearance }
    }

    pub fn resolve(&self, conduit: &Conduit, axis: &Line, host: &StructuralElement) -> Resolution {
        // Hosts without a reference line (floors) skip the angle check
        if let Some(host_axis) = adapter::get_curve(host) {
            if !is_perpendicular(axis, &host_axis) {
                return Err(SkipReason::NotPerpendicular {
                    angle: axis.angle_to(&host_axis),
                });
            }
        }

        let solid = adapter::get_solid(host).ok_or(SkipReason::NoSolid)?;

        let intersection = solid
            .intersect_with_curve(axis)
            .map_err(SkipReason::IntersectionFailed)?;

        // A re-entrant host only gets a sleeve at its first crossing
        let segment = intersection.segment(0).ok_or(SkipReason::NoSegments)?;

        Ok(PenetrationResult {
            center: segment.midpoint(),
            cleared_diameter: conduit.outer_diameter + self.clearance,
            host: host.id,
            host_class: host.class,
            host_level: host.level,
            source_conduit_id: conduit.unique_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GeometryObject, HostClass, LevelId, Location};
    use crate::geometry::Solid;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn conduit(axis: Line) -> Conduit {
        Conduit {
            id: ElementId(500),
            unique_id: "pipe-500".to_string(),
            location: Location::Curve(axis),
            outer_diameter: 0.5,
        }
    }

    fn wall(baseline: Line, geometry: Option<Vec<GeometryObject>>) -> StructuralElement {
        StructuralElement {
            id: ElementId(10),
            class: HostClass::Wall,
            name: "Wall".to_string(),
            level: Some(LevelId(1)),
            location: Location::Curve(baseline),
            geometry,
        }
    }

    fn standard_wall() -> StructuralElement {
        let baseline = Line::new(Point3::new(5.25, -5.0, 0.0), Point3::new(5.25, 20.0, 0.0));
        let solid = Solid::wall(&baseline, 0.5, 10.0);
        wall(baseline, Some(vec![GeometryObject::Solid(solid)]))
    }

    #[test]
    fn test_resolves_center_of_crossing() {
        let axis = Line::new(Point3::new(0.0, 3.3, 1.2), Point3::new(10.0, 3.3, 1.2));
        let resolver = IntersectionResolver::new(0.25);

        let result = resolver.resolve(&conduit(axis), &axis, &standard_wall()).unwrap();

        assert_relative_eq!(result.center.x, 5.25, epsilon = 1e-9);
        assert_relative_eq!(result.center.y, 3.3, epsilon = 1e-9);
        assert_relative_eq!(result.center.z, 1.2, epsilon = 1e-9);
        assert_relative_eq!(result.cleared_diameter, 0.75);
        assert_eq!(result.host, ElementId(10));
        assert_eq!(result.host_level, Some(LevelId(1)));
        assert_eq!(result.source_conduit_id, "pipe-500");
    }

    #[test]
    fn test_rejects_non_perpendicular_host() {
        let axis = Line::new(Point3::new(0.0, 0.0, 1.2), Point3::new(10.0, 10.0, 1.2));
        let resolver = IntersectionResolver::new(0.0);

        let err = resolver.resolve(&conduit(axis), &axis, &standard_wall()).unwrap_err();
        assert!(matches!(err, SkipReason::NotPerpendicular { .. }));
        assert_eq!(err.label(), "not_perpendicular");
    }

    #[test]
    fn test_rejects_host_without_solid() {
        let axis = Line::new(Point3::new(0.0, 3.3, 1.2), Point3::new(10.0, 3.3, 1.2));
        let baseline = Line::new(Point3::new(5.25, -5.0, 0.0), Point3::new(5.25, 20.0, 0.0));
        let resolver = IntersectionResolver::new(0.0);

        let err = resolver
            .resolve(&conduit(axis), &axis, &wall(baseline, Some(vec![GeometryObject::Empty])))
            .unwrap_err();
        assert_eq!(err, SkipReason::NoSolid);
    }

    #[test]
    fn test_malformed_solid_is_a_skip() {
        let axis = Line::new(Point3::new(0.0, 3.3, 1.2), Point3::new(10.0, 3.3, 1.2));
        let baseline = Line::new(Point3::new(5.25, -5.0, 0.0), Point3::new(5.25, 20.0, 0.0));
        let broken = Solid::new(vec![Point3::origin()], vec![[0, 3, 9]]);
        let resolver = IntersectionResolver::new(0.0);

        let err = resolver
            .resolve(
                &conduit(axis),
                &axis,
                &wall(baseline, Some(vec![GeometryObject::Solid(broken)])),
            )
            .unwrap_err();
        assert!(matches!(err, SkipReason::IntersectionFailed(_)));
    }

    #[test]
    fn test_conduit_stopping_short_has_no_segments() {
        let axis = Line::new(Point3::new(0.0, 3.3, 1.2), Point3::new(4.0, 3.3, 1.2));
        let resolver = IntersectionResolver::new(0.0);

        let err = resolver.resolve(&conduit(axis), &axis, &standard_wall()).unwrap_err();
        assert_eq!(err, SkipReason::NoSegments);
    }

    #[test]
    fn test_floor_without_curve_skips_angle_check() {
        let axis = Line::new(Point3::new(3.0, 7.0, -1.0), Point3::new(3.0, 7.0, 8.0));
        let slab = StructuralElement {
            id: ElementId(20),
            class: HostClass::Floor,
            name: "Slab".to_string(),
            level: None,
            location: Location::None,
            geometry: Some(vec![GeometryObject::Solid(Solid::cuboid(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 10.0, 0.5),
            ))]),
        };

        let result = IntersectionResolver::new(0.0)
            .resolve(&conduit(axis), &axis, &slab)
            .unwrap();

        assert_relative_eq!(result.center.z, 0.25, epsilon = 1e-9);
        assert_eq!(result.host_class, HostClass::Floor);
    }

    #[test]
    fn test_only_first_segment_is_used() {
        let axis = Line::new(Point3::new(0.0, 0.3, 0.4), Point3::new(10.0, 0.3, 0.4));
        let re_entrant = Solid::compound(&[
            Solid::cuboid(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0)),
            Solid::cuboid(Point3::new(6.0, 0.0, 0.0), Point3::new(7.0, 1.0, 1.0)),
        ]);
        let slab = StructuralElement {
            id: ElementId(30),
            class: HostClass::Floor,
            name: String::new(),
            level: None,
            location: Location::None,
            geometry: Some(vec![GeometryObject::Solid(re_entrant)]),
        };

        let result = IntersectionResolver::new(0.0)
            .resolve(&conduit(axis), &axis, &slab)
            .unwrap();
        assert_relative_eq!(result.center.x, 2.5, epsilon = 1e-9);
    }
}
