//! Accessors that pull a straight curve or a representative solid out of host elements.

use crate::domain::model::{Conduit, GeometryObject, Location, StructuralElement};
use crate::geometry::{Line, Solid};

/// The element's location curve, if it is located by a line.
///
/// Point-located and unlocated elements (floors, for instance) yield `None`.
pub fn get_curve(element: &StructuralElement) -> Option<Line> {
    curve_of(&element.location)
}

pub fn get_conduit_curve(conduit: &Conduit) -> Option<Line> {
    curve_of(&conduit.location)
}

/// First solid in the element's geometry. Further solids are ignored.
pub fn get_solid(element: &StructuralElement) -> Option<&Solid> {
    element.geometry.as_ref()?.iter().find_map(|object| match object {
        GeometryObject::Solid(solid) => Some(solid),
        _ => None,
    })
}

fn curve_of(location: &Location) -> Option<Line> {
    match location {
        Location::Curve(line) => Some(*line),
        Location::Point(_) | Location::None => None,
    }
}
