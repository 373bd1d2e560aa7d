//! Plane representation in homogeneous form.

use nalgebra::{Point3, Vector3, Vector4};

/// A plane in 3D space, represented as `normal · point + d = 0`.
///
/// The normal is not required to be unit length. Frustum planes are
/// normalized on construction so that signed distances are in world units;
/// triangle planes keep their raw cross-product normal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane3D {
    normal: Vector3<f32>,
    d: f32,
}

impl Plane3D {
    /// Creates a plane from a normal and the constant term `d`.
    #[inline]
    pub fn new(normal: Vector3<f32>, d: f32) -> Self {
        Self { normal, d }
    }

    /// Creates the plane through `point` with the given normal.
    ///
    /// `d` is `-normal · point`, so the point evaluates to zero.
    #[inline]
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            normal,
            d: -normal.dot(&point.coords),
        }
    }

    /// Creates the plane through three points.
    /// The normal is `(b - a) × (c - a)` and is left unnormalized.
    pub fn from_three_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = (b - a).cross(&(c - a));
        Self::from_point_and_normal(a, normal)
    }

    /// Creates a plane from packed `(a, b, c, d)` coefficients.
    #[inline]
    pub fn from_coefficients(coefficients: Vector4<f32>) -> Self {
        Self {
            normal: coefficients.xyz(),
            d: coefficients.w,
        }
    }

    /// Returns the plane normal.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the constant term of the plane equation.
    #[inline]
    pub fn d(&self) -> f32 {
        self.d
    }

    /// Evaluates the plane equation at `point` (the point has an implicit w of 1).
    ///
    /// For a unit normal this is the signed distance:
    /// positive on the side the normal points to, negative behind.
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) + self.d
    }

    /// Returns the plane scaled so its normal has unit length.
    ///
    /// Returns `None` if the normal has zero length.
    pub fn normalized(&self) -> Option<Self> {
        let len = self.normal.norm();
        if len > f32::EPSILON {
            Some(Self {
                normal: self.normal / len,
                d: self.d / len,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_and_normal_evaluates_to_zero_on_plane() {
        let plane = Plane3D::from_point_and_normal(Point3::new(0.0, 2.0, 0.0), Vector3::y());
        assert_relative_eq!(plane.d(), -2.0);
        assert_relative_eq!(plane.signed_distance(Point3::new(5.0, 2.0, -3.0)), 0.0);
        assert_relative_eq!(plane.signed_distance(Point3::new(0.0, 5.0, 0.0)), 3.0);
        assert_relative_eq!(plane.signed_distance(Point3::new(0.0, 0.0, 0.0)), -2.0);
    }

    #[test]
    fn three_points_follow_right_hand_rule() {
        let plane = Plane3D::from_three_points(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        );
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.signed_distance(Point3::new(0.3, 0.3, 1.0)), 0.0);
    }

    #[test]
    fn normalize_scales_normal_and_offset() {
        let plane = Plane3D::new(Vector3::new(0.0, 0.0, 4.0), 8.0);
        let unit = plane.normalized().unwrap();
        assert_relative_eq!(unit.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(unit.d(), 2.0);
        assert_relative_eq!(unit.signed_distance(Point3::new(0.0, 0.0, -2.0)), 0.0);
    }

    #[test]
    fn normalize_degenerate_is_none() {
        let plane = Plane3D::new(Vector3::zeros(), 1.0);
        assert!(plane.normalized().is_none());
    }
}
