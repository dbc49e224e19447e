//! Classification of conduit axes into vertical, horizontal or skew.
//!
//! Coordinate deltas are compared after rounding to whole model units, so two
//! endpoints within half a unit of each other count as level. That is a coarse,
//! architectural-scale tolerance, not a float-precision guard.

use crate::domain::model::HostClass;
use crate::geometry::{round_to, Line};
use std::f64::consts::FRAC_PI_2;

/// Decimal places used when comparing an angle with a right angle.
pub const PERPENDICULAR_DECIMALS: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Vertical,
    Horizontal,
    Skew,
}

impl Orientation {
    /// Host class a conduit of this orientation can penetrate.
    pub fn host_class(self) -> Option<HostClass> {
        match self {
            Orientation::Vertical => Some(HostClass::Floor),
            Orientation::Horizontal => Some(HostClass::Wall),
            Orientation::Skew => None,
        }
    }
}

pub fn classify(line: &Line) -> Orientation {
    if is_vertical(line) {
        Orientation::Vertical
    } else if is_horizontal(line) {
        Orientation::Horizontal
    } else {
        Orientation::Skew
    }
}

pub fn is_horizontal(line: &Line) -> bool {
    let (start, end) = (line.start(), line.end());
    round_to(start.z - end.z, 0) == 0.0
}

pub fn is_vertical(line: &Line) -> bool {
    let (start, end) = (line.start(), line.end());
    round_to(start.x - end.x, 0) == 0.0
        && round_to(start.y - end.y, 0) == 0.0
        && round_to(start.z - end.z, 0) != 0.0
}

/// Whether the two axes meet at a right angle, compared to 4 decimal places.
pub fn is_perpendicular(a: &Line, b: &Line) -> bool {
    round_to(a.angle_to(b), PERPENDICULAR_DECIMALS) == round_to(FRAC_PI_2, PERPENDICULAR_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn line(a: [f64; 3], b: [f64; 3]) -> Line {
        Line::new(Point3::from(a), Point3::from(b))
    }

    #[test]
    fn test_classify_vertical() {
        let riser = line([3.0, 7.0, -1.0], [3.0, 7.0, 8.0]);
        assert_eq!(classify(&riser), Orientation::Vertical);
        assert_eq!(classify(&riser).host_class(), Some(HostClass::Floor));
    }

    #[test]
    fn test_classify_horizontal_any_plan_direction() {
        assert_eq!(classify(&line([0.0, 0.0, 1.2], [10.0, 0.0, 1.2])), Orientation::Horizontal);
        assert_eq!(classify(&line([0.0, 0.0, 1.2], [4.0, -7.0, 1.2])), Orientation::Horizontal);
        assert_eq!(
            classify(&line([0.0, 0.0, 1.2], [4.0, -7.0, 1.2])).host_class(),
            Some(HostClass::Wall)
        );
    }

    #[test]
    fn test_classify_skew() {
        let sloped = line([0.0, 0.0, 0.0], [10.0, 0.0, 3.0]);
        assert_eq!(classify(&sloped), Orientation::Skew);
        assert_eq!(classify(&sloped).host_class(), None);
    }

    #[test]
    fn test_rounding_tolerance() {
        // Half a unit of drop still counts as level
        assert_eq!(classify(&line([0.0, 0.0, 0.0], [10.0, 0.0, 0.5])), Orientation::Horizontal);
        assert_eq!(classify(&line([0.0, 0.0, 0.0], [10.0, 0.0, 0.6])), Orientation::Skew);
        // Small plan drift on a riser is tolerated
        assert_eq!(classify(&line([0.0, 0.0, 0.0], [0.4, -0.3, 9.0])), Orientation::Vertical);
        assert_eq!(classify(&line([0.0, 0.0, 0.0], [0.7, 0.0, 9.0])), Orientation::Skew);
    }

    #[test]
    fn test_classification_is_exclusive() {
        let samples = [
            line([0.0, 0.0, 0.0], [0.0, 0.0, 5.0]),
            line([0.0, 0.0, 0.0], [5.0, 0.0, 0.0]),
            line([0.0, 0.0, 0.0], [5.0, 5.0, 5.0]),
            line([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]),
            line([0.0, 0.0, 0.0], [0.2, 0.2, 0.2]),
        ];
        for sample in &samples {
            let flags = [is_vertical(sample), is_horizontal(sample)];
            assert!(flags.iter().filter(|f| **f).count() <= 1);
            let expected = match flags {
                [true, false] => Orientation::Vertical,
                [false, true] => Orientation::Horizontal,
                _ => Orientation::Skew,
            };
            assert_eq!(classify(sample), expected);
        }
    }

    #[test]
    fn test_is_perpendicular() {
        let x = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let y = line([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let diagonal = line([0.0, 0.0, 0.0], [1.0, 1.0, 0.0]);
        let minus_x = line([0.0, 0.0, 0.0], [-1.0, 0.0, 0.0]);

        assert!(is_perpendicular(&x, &y));
        assert!(!is_perpendicular(&x, &x));
        assert!(!is_perpendicular(&x, &diagonal));
        assert!(!is_perpendicular(&x, &minus_x));
    }

    #[test]
    fn test_is_perpendicular_within_rounding() {
        let x = line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        // ~0.00002 rad off a right angle rounds to the same 4 decimals
        let nearly = line([0.0, 0.0, 0.0], [0.00002, 1.0, 0.0]);
        // ~0.001 rad off does not
        let off = line([0.0, 0.0, 0.0], [0.001, 1.0, 0.0]);

        assert!(is_perpendicular(&x, &nearly));
        assert!(!is_perpendicular(&x, &off));
    }
}
