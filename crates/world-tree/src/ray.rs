//! Rays and the ray/plane and ray/triangle intersection primitives.

use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};

use crate::{Axis, Plane3D, Triangle};

/// A ray given by an origin and a direction.
///
/// The direction does not need to be normalized. Intersections are computed
/// against the infinite line through the origin: hits behind the origin are
/// reported as well.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray3 {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray3 {
    #[inline]
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    /// Ray from `from` towards `to`.
    #[inline]
    pub fn through(from: Point3<f32>, to: Point3<f32>) -> Self {
        Self::new(from, to - from)
    }

    /// Builds a picking ray for a point on screen.
    ///
    /// `ndc` is the pointer position in normalized device coordinates
    /// (`[-1, 1]` on both axes, +y up). The point is unprojected onto the
    /// near and far clip planes through the inverse of `view_projection`; the
    /// ray starts at `eye` and runs along `far - near`.
    ///
    /// Returns `None` if the matrix is not invertible.
    pub fn from_screen(view_projection: &Matrix4<f32>, ndc: Point2<f32>, eye: Point3<f32>) -> Option<Self> {
        let inverse = view_projection.try_inverse()?;
        let near = inverse.transform_point(&Point3::new(ndc.x, ndc.y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc.x, ndc.y, 1.0));
        Some(Self::new(eye, far - near))
    }

    /// Returns the point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Intersects the ray's line with a plane.
    ///
    /// Returns `None` when the direction is parallel to the plane, including
    /// the case where the line lies in the plane.
    pub fn intersect_plane(&self, plane: &Plane3D) -> Option<Point3<f32>> {
        let n_dot_q_plus_d = plane.signed_distance(self.origin);
        let n_dot_v = plane.normal().dot(&self.direction);
        if n_dot_v == 0.0 {
            return None;
        }
        Some(self.at(-n_dot_q_plus_d / n_dot_v))
    }

    /// Intersects the ray's line with a triangle.
    ///
    /// The hit point on the triangle's plane is projected, together with the
    /// triangle, onto the cardinal plane the face normal is most aligned
    /// with, and tested against the three edge normals there. The point is
    /// inside when all three edge tests are >= 0 or all are <= 0, so the
    /// triangle's winding does not matter.
    pub fn intersect_triangle(&self, triangle: &Triangle) -> Option<Point3<f32>> {
        let hit = self.intersect_plane(&triangle.plane())?;

        let (u, v) = projection_axes(&triangle.face_normal());
        let project = |p: &Point3<f32>| Vector2::new(p[u], p[v]);

        let [a, b, c] = triangle.vertices();
        let p = [project(a), project(b), project(c)];
        let q = project(&hit);

        let edge_normals = [
            rotate_ccw(p[0] - p[1]),
            rotate_ccw(p[1] - p[2]),
            rotate_ccw(p[2] - p[0]),
        ];
        let sides = [
            edge_normals[0].dot(&(q - p[0])),
            edge_normals[1].dot(&(q - p[1])),
            edge_normals[2].dot(&(q - p[2])),
        ];

        let inside = sides.iter().all(|&s| s >= 0.0) || sides.iter().all(|&s| s <= 0.0);
        inside.then_some(hit)
    }
}

/// Picks the two coordinates kept when flattening onto the cardinal plane
/// most parallel to a face with the given normal (YZ, XZ or XY).
fn projection_axes(normal: &Vector3<f32>) -> (usize, usize) {
    let abs = normal.abs();
    let dominant = Axis::ALL
        .into_iter()
        .fold(Axis::X, |best, axis| {
            if abs[axis.index()] > abs[best.index()] {
                axis
            } else {
                best
            }
        });
    match dominant {
        Axis::X => (1, 2),
        Axis::Y => (0, 2),
        Axis::Z => (0, 1),
    }
}

#[inline]
fn rotate_ccw(v: Vector2<f32>) -> Vector2<f32> {
    Vector2::new(-v.y, v.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Perspective3, Vector4};

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle::new(Point3::from(a), Point3::from(b), Point3::from(c))
    }

    #[test]
    fn plane_hit_in_front_and_behind() {
        let plane = Plane3D::new(Vector3::y(), 0.0);

        let down = Ray3::new(Point3::new(1.0, 5.0, 2.0), Vector3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(down.intersect_plane(&plane).unwrap(), Point3::new(1.0, 0.0, 2.0));

        // The line extends behind the origin.
        let up = Ray3::new(Point3::new(1.0, 5.0, 2.0), Vector3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(up.intersect_plane(&plane).unwrap(), Point3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn parallel_ray_misses_plane() {
        let plane = Plane3D::new(Vector3::y(), 0.0);
        let above = Ray3::new(Point3::new(0.0, 1.0, 0.0), Vector3::x());
        assert!(above.intersect_plane(&plane).is_none());

        let inside = Ray3::new(Point3::origin(), Vector3::x());
        assert!(inside.intersect_plane(&plane).is_none());
    }

    #[test]
    fn triangle_hit_at_centroid() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let centroid = tri.centroid();
        let ray = Ray3::new(centroid + Vector3::z() * 4.0, -tri.face_normal());

        assert_relative_eq!(ray.intersect_triangle(&tri).unwrap(), centroid, epsilon = 1e-6);
    }

    #[test]
    fn triangle_hit_with_either_winding() {
        let ccw = make_triangle([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 2.0]);
        let cw = make_triangle([0.0, 0.0, 0.0], [0.0, 0.0, 2.0], [2.0, 0.0, 0.0]);
        let ray = Ray3::new(Point3::new(0.5, 3.0, 0.5), Vector3::new(0.0, -1.0, 0.0));

        assert_relative_eq!(ray.intersect_triangle(&ccw).unwrap(), Point3::new(0.5, 0.0, 0.5));
        assert_relative_eq!(ray.intersect_triangle(&cw).unwrap(), Point3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn triangle_miss_outside_edges() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let ray = Ray3::new(Point3::new(0.8, 0.8, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(ray.intersect_triangle(&tri).is_none());
    }

    #[test]
    fn triangle_edge_counts_as_hit() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let ray = Ray3::new(Point3::new(0.5, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(ray.intersect_triangle(&tri).is_some());
    }

    #[test]
    fn tilted_triangle_uses_dominant_axis() {
        // Mostly facing +X, so the test runs in the YZ plane.
        let tri = make_triangle([0.0, 0.0, 0.0], [0.2, 1.0, 0.0], [0.2, 0.0, 1.0]);
        let ray = Ray3::new(Point3::new(5.0, 0.25, 0.25), Vector3::new(-1.0, 0.0, 0.0));
        let hit = ray.intersect_triangle(&tri).unwrap();
        assert_relative_eq!(tri.plane().signed_distance(hit), 0.0, epsilon = 1e-5);
        assert_relative_eq!(hit.y, 0.25);
        assert_relative_eq!(hit.z, 0.25);
    }

    #[test]
    fn degenerate_triangle_never_hit() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        let ray = Ray3::new(Point3::new(1.0, 5.0, 1.0), Vector3::new(0.0, -1.0, 0.0));
        assert!(ray.intersect_triangle(&tri).is_none());
    }

    #[test]
    fn screen_center_ray_points_down_view_axis() {
        let eye = Point3::new(0.0, 0.0, 10.0);
        let view = Matrix4::look_at_rh(&eye, &Point3::origin(), &Vector3::y());
        let projection = Perspective3::new(1.0, std::f32::consts::FRAC_PI_4, 1.0, 100.0);
        let view_projection = projection.as_matrix() * view;

        let ray = Ray3::from_screen(&view_projection, Point2::origin(), eye).unwrap();
        let dir = ray.direction.normalize();
        assert_relative_eq!(dir, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-4);
        assert_eq!(ray.origin, eye);
    }

    #[test]
    fn singular_matrix_has_no_screen_ray() {
        let singular = Matrix4::from_diagonal(&Vector4::new(1.0, 1.0, 0.0, 1.0));
        assert!(Ray3::from_screen(&singular, Point2::origin(), Point3::origin()).is_none());
    }
}
