//! World triangle with per-vertex shading attributes and material ids.

use nalgebra::{Point2, Point3, Vector3};

use crate::Plane3D;

/// Identifier of a diffuse or normal-map material, as handed out by the
/// rendering backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialId(pub u32);

/// A single static world triangle.
///
/// Besides its three positions the triangle carries per-vertex normals,
/// texture coordinates and alpha, plus the ids of its diffuse and normal-map
/// materials. Triangles are immutable once created; the `with_*` methods
/// return modified copies.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    vertices: [Point3<f32>; 3],
    normals: [Vector3<f32>; 3],
    tex_coords: [Point2<f32>; 3],
    alpha: [f32; 3],
    diffuse: MaterialId,
    normal_map: MaterialId,
}

impl Triangle {
    /// Creates a new triangle from three points.
    ///
    /// The winding order determines the face normal via the right-hand rule:
    /// normal = (b - a) × (c - a). Shading attributes start zeroed, alpha at
    /// 1.0 and both materials at id 0.
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self {
            vertices: [a, b, c],
            normals: [Vector3::zeros(); 3],
            tex_coords: [Point2::origin(); 3],
            alpha: [1.0; 3],
            diffuse: MaterialId::default(),
            normal_map: MaterialId::default(),
        }
    }

    /// Returns a copy using the given diffuse and normal-map materials.
    pub fn with_materials(mut self, diffuse: MaterialId, normal_map: MaterialId) -> Self {
        self.diffuse = diffuse;
        self.normal_map = normal_map;
        self
    }

    /// Returns a copy with the given per-vertex normals.
    pub fn with_normals(mut self, normals: [Vector3<f32>; 3]) -> Self {
        self.normals = normals;
        self
    }

    /// Returns a copy with the given per-vertex texture coordinates.
    pub fn with_tex_coords(mut self, tex_coords: [Point2<f32>; 3]) -> Self {
        self.tex_coords = tex_coords;
        self
    }

    /// Returns a copy with the given per-vertex alpha values.
    pub fn with_alpha(mut self, alpha: [f32; 3]) -> Self {
        self.alpha = alpha;
        self
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>; 3] {
        &self.vertices
    }

    #[inline]
    pub fn normals(&self) -> &[Vector3<f32>; 3] {
        &self.normals
    }

    #[inline]
    pub fn tex_coords(&self) -> &[Point2<f32>; 3] {
        &self.tex_coords
    }

    #[inline]
    pub fn alpha(&self) -> &[f32; 3] {
        &self.alpha
    }

    #[inline]
    pub fn diffuse(&self) -> MaterialId {
        self.diffuse
    }

    #[inline]
    pub fn normal_map(&self) -> MaterialId {
        self.normal_map
    }

    /// Key used to order triangles before batching.
    ///
    /// Only the diffuse material takes part in the ordering.
    #[inline]
    pub fn batch_key(&self) -> MaterialId {
        self.diffuse
    }

    /// Computes the (unnormalized) face normal of the triangle.
    pub fn face_normal(&self) -> Vector3<f32> {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Computes the unit face normal.
    ///
    /// Returns `None` if the triangle is degenerate (zero area).
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        let n = self.face_normal();
        let len = n.norm();
        if len > f32::EPSILON {
            Some(n / len)
        } else {
            None
        }
    }

    /// Returns the plane that this triangle lies on, using the raw face normal.
    pub fn plane(&self) -> Plane3D {
        let [a, b, c] = self.vertices;
        Plane3D::from_three_points(a, b, c)
    }

    /// Computes the centroid (center of mass) of the triangle.
    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = &self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Returns `true` for zero-area triangles or ones with non-finite coordinates.
    pub fn is_degenerate(&self) -> bool {
        let finite = self
            .vertices
            .iter()
            .all(|v| v.coords.iter().all(|c| c.is_finite()));
        !finite || self.unit_normal().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle::new(Point3::from(a), Point3::from(b), Point3::from(c))
    }

    #[test]
    fn defaults_are_opaque_and_untextured() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(tri.alpha(), &[1.0; 3]);
        assert_eq!(tri.diffuse(), MaterialId(0));
        assert_eq!(tri.normal_map(), MaterialId(0));
    }

    #[test]
    fn builders_set_attributes() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])
            .with_materials(MaterialId(7), MaterialId(9))
            .with_alpha([0.5, 0.25, 1.0])
            .with_normals([Vector3::z(); 3])
            .with_tex_coords([Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)]);

        assert_eq!(tri.diffuse(), MaterialId(7));
        assert_eq!(tri.normal_map(), MaterialId(9));
        assert_eq!(tri.batch_key(), MaterialId(7));
        assert_eq!(tri.alpha()[1], 0.25);
        assert_eq!(tri.normals()[2], Vector3::z());
        assert_eq!(tri.tex_coords()[1], Point2::new(1.0, 0.0));
    }

    #[test]
    fn face_normal_follows_winding() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_relative_eq!(tri.face_normal(), Vector3::new(0.0, 0.0, 1.0));

        let flipped = make_triangle([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        assert_relative_eq!(flipped.unit_normal().unwrap(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn centroid_is_vertex_average() {
        let tri = make_triangle([0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 3.0, 3.0]);
        assert_relative_eq!(tri.centroid(), Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn plane_contains_all_vertices() {
        let tri = make_triangle([1.0, 2.0, 0.0], [4.0, 1.0, 2.0], [0.0, 3.0, 5.0]);
        let plane = tri.plane();
        for v in tri.vertices() {
            assert_relative_eq!(plane.signed_distance(*v), 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn degenerate_detection() {
        let collinear = make_triangle([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        assert!(collinear.is_degenerate());

        let nan = make_triangle([f32::NAN, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(nan.is_degenerate());

        let fine = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(!fine.is_degenerate());
    }
}
