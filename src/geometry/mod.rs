//! Geometry primitives shared by the placement core.
//!
//! Coordinates are `nalgebra` points in model length units. Hosts are closed
//! triangle meshes ([`Solid`]), conduits and host axes are bounded [`Line`]s.

pub mod line;
pub mod solid;

pub use line::Line;
pub use solid::{Solid, SolidCurveIntersection};

use thiserror::Error;

/// Failures raised by the geometry engine itself.
///
/// The resolver treats every variant as "no intersection for this candidate".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Curve is degenerate (zero length)")]
    DegenerateCurve,

    #[error("Solid has no faces")]
    EmptySolid,

    #[error("Solid face {face} references vertex {index} but only {vertex_count} vertices exist")]
    InvalidFaceIndex {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("Non-finite coordinate in {what}")]
    NonFiniteCoordinate { what: &'static str },

    #[error("Solid is not closed: curve crosses its boundary {crossings} times")]
    OpenSolid { crossings: usize },
}

/// 以「四捨六入五成雙」取到指定小數位，與宿主平台的預設捨入一致
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
