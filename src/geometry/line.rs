use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A bounded, directed straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    start: Point3<f64>,
    end: Point3<f64>,
}

impl Line {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Point3<f64> {
        self.start
    }

    pub fn end(&self) -> Point3<f64> {
        self.end
    }

    /// 取得端點：0 為起點，其餘為終點
    pub fn end_point(&self, index: usize) -> Point3<f64> {
        if index == 0 {
            self.start
        } else {
            self.end
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() < f64::EPSILON
    }

    pub fn is_finite(&self) -> bool {
        self.start.iter().chain(self.end.iter()).all(|c| c.is_finite())
    }

    /// Unit direction from start to end, or the zero vector for a degenerate line.
    pub fn direction(&self) -> Vector3<f64> {
        let delta = self.end - self.start;
        let norm = delta.norm();
        if norm < f64::EPSILON {
            return Vector3::zeros();
        }
        delta / norm
    }

    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    /// Point at normalized parameter `t` (0 = start, 1 = end).
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.start + (self.end - self.start) * t
    }

    /// Angle between the two directions, in `[0, π]`.
    pub fn angle_to(&self, other: &Line) -> f64 {
        let a = self.direction();
        let b = other.direction();
        if a == Vector3::zeros() || b == Vector3::zeros() {
            return 0.0;
        }
        a.dot(&b).clamp(-1.0, 1.0).acos()
    }
}
