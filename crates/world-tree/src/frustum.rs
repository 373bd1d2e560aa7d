//! View frustum and box culling.

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::{Aabb, Plane3D};

/// The six planes bounding a camera's view volume.
///
/// Plane normals point into the frustum: a point is inside when every plane
/// evaluates to a non-negative value at it. Planes are ordered left, right,
/// bottom, top, near, far.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frustum {
    planes: [Plane3D; 6],
}

impl Frustum {
    /// Wraps six inward-facing planes.
    pub fn new(planes: [Plane3D; 6]) -> Self {
        Self { planes }
    }

    /// Extracts the frustum planes of a combined `projection * view` matrix.
    ///
    /// Each plane is the last matrix row plus or minus one of the first three
    /// rows, normalized so plane distances are in world units. A plane whose
    /// normal vanishes is kept unnormalized.
    pub fn from_view_projection(view_projection: &Matrix4<f32>) -> Self {
        let m = view_projection;
        let w = m.row(3).transpose();
        let plane = |coefficients: Vector4<f32>| {
            let raw = Plane3D::from_coefficients(coefficients);
            raw.normalized().unwrap_or(raw)
        };

        Self::new([
            plane(w + m.row(0).transpose()),
            plane(w - m.row(0).transpose()),
            plane(w + m.row(1).transpose()),
            plane(w - m.row(1).transpose()),
            plane(w + m.row(2).transpose()),
            plane(w - m.row(2).transpose()),
        ])
    }

    #[inline]
    pub fn planes(&self) -> &[Plane3D; 6] {
        &self.planes
    }

    /// Returns `true` if `bounds` lies entirely outside at least one plane.
    ///
    /// For each plane the box's half extents are projected onto the plane
    /// normal and combined as a root sum of squares, giving the box's
    /// effective radius along that normal. The box is outside when its
    /// center evaluates to `-radius` or less.
    pub fn culls(&self, bounds: &Aabb) -> bool {
        let half = bounds.half_extents();
        let center = bounds.center();
        self.planes
            .iter()
            .any(|plane| plane.signed_distance(center) <= -effective_radius(&half, plane))
    }
}

/// Projected radius of a box with the given half extents along `plane`'s normal.
pub fn effective_radius(half_extents: &Vector3<f32>, plane: &Plane3D) -> f32 {
    half_extents.component_mul(&plane.normal()).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Perspective3, Point3};

    fn unit_box_at(center: Point3<f32>) -> Aabb {
        Aabb::new(
            center - Vector3::new(0.5, 0.5, 0.5),
            center + Vector3::new(0.5, 0.5, 0.5),
        )
    }

    #[test]
    fn identity_matrix_yields_clip_cube() {
        let frustum = Frustum::from_view_projection(&Matrix4::identity());
        let expected = [
            Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 1.0),
            Plane3D::new(Vector3::new(-1.0, 0.0, 0.0), 1.0),
            Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 1.0),
            Plane3D::new(Vector3::new(0.0, -1.0, 0.0), 1.0),
            Plane3D::new(Vector3::new(0.0, 0.0, 1.0), 1.0),
            Plane3D::new(Vector3::new(0.0, 0.0, -1.0), 1.0),
        ];
        for (plane, expected) in frustum.planes().iter().zip(&expected) {
            assert_relative_eq!(plane.normal(), expected.normal());
            assert_relative_eq!(plane.d(), expected.d());
        }
    }

    #[test]
    fn effective_radius_of_axis_plane_is_half_extent() {
        let half = Vector3::new(1.0, 2.0, 3.0);
        let plane = Plane3D::new(Vector3::y(), 0.0);
        assert_relative_eq!(effective_radius(&half, &plane), 2.0);

        let diagonal = Plane3D::new(Vector3::new(1.0, 1.0, 0.0).normalize(), 0.0);
        assert_relative_eq!(
            effective_radius(&half, &diagonal),
            (0.5f32 + 2.0).sqrt(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn box_inside_clip_cube_survives() {
        let frustum = Frustum::from_view_projection(&Matrix4::identity());
        assert!(!frustum.culls(&unit_box_at(Point3::origin())));
    }

    #[test]
    fn box_straddling_plane_survives() {
        let frustum = Frustum::from_view_projection(&Matrix4::identity());
        assert!(!frustum.culls(&unit_box_at(Point3::new(1.2, 0.0, 0.0))));
    }

    #[test]
    fn box_outside_one_plane_is_culled() {
        let frustum = Frustum::from_view_projection(&Matrix4::identity());
        assert!(frustum.culls(&unit_box_at(Point3::new(3.0, 0.0, 0.0))));
        assert!(frustum.culls(&unit_box_at(Point3::new(0.0, 0.0, -3.0))));
    }

    #[test]
    fn box_touching_plane_from_outside_is_culled() {
        let frustum = Frustum::from_view_projection(&Matrix4::identity());
        // The box spans x in [1, 2], so its center sits exactly at -radius.
        assert!(frustum.culls(&unit_box_at(Point3::new(1.5, 0.0, 0.0))));
    }

    #[test]
    fn perspective_camera_sees_what_is_in_front() {
        let eye = Point3::new(0.0, 0.0, 10.0);
        let view = Matrix4::look_at_rh(&eye, &Point3::origin(), &Vector3::y());
        let projection = Perspective3::new(1.0, std::f32::consts::FRAC_PI_2, 1.0, 100.0);
        let frustum = Frustum::from_view_projection(&(projection.as_matrix() * view));

        assert!(!frustum.culls(&unit_box_at(Point3::origin())));
        assert!(frustum.culls(&unit_box_at(Point3::new(0.0, 0.0, 20.0))));
        assert!(frustum.culls(&unit_box_at(Point3::new(0.0, 0.0, -200.0))));
        assert!(frustum.culls(&unit_box_at(Point3::new(50.0, 0.0, 0.0))));
    }
}
