//! World tree node implementation.

use crate::{Aabb, DrawBatch, Face, Plane3D, Ray3, Triangle};

/// A node in the world tree.
///
/// Every node stores the bounding box of the triangles it was built from and
/// the six face planes of that box. Internal nodes own one or two children
/// and nothing else; leaves own their triangles and the draw batches made
/// from them.
#[derive(Debug)]
pub struct WorldNode<H> {
    depth: u16,

    bounds: Aabb,

    /// Face planes of `bounds`, indexed in [`Face::ALL`] order.
    planes: [Plane3D; 6],

    /// Triangles of a leaf, sorted by diffuse material. Empty on internal nodes.
    triangles: Vec<Triangle>,

    /// Material batches of a leaf. Empty on internal nodes.
    batches: Vec<DrawBatch<H>>,

    /// Subtree of triangles whose centroid lies below the split midpoint.
    left: Option<Box<WorldNode<H>>>,

    /// Subtree of triangles whose centroid lies at or above the split midpoint.
    right: Option<Box<WorldNode<H>>>,
}

impl<H> WorldNode<H> {
    /// Creates a leaf holding `triangles` and their batches.
    pub(crate) fn leaf(
        depth: u16,
        bounds: Aabb,
        triangles: Vec<Triangle>,
        batches: Vec<DrawBatch<H>>,
    ) -> Self {
        Self {
            depth,
            bounds,
            planes: bounds.face_planes(),
            triangles,
            batches,
            left: None,
            right: None,
        }
    }

    /// Creates an internal node over the given children.
    pub(crate) fn internal(
        depth: u16,
        bounds: Aabb,
        left: Option<WorldNode<H>>,
        right: Option<WorldNode<H>>,
    ) -> Self {
        Self {
            depth,
            bounds,
            planes: bounds.face_planes(),
            triangles: Vec::new(),
            batches: Vec::new(),
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    /// Depth of the node, 0 at the root.
    #[inline]
    pub fn depth(&self) -> u16 {
        self.depth
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Returns the cached face planes, indexed in [`Face::ALL`] order.
    #[inline]
    pub fn planes(&self) -> &[Plane3D; 6] {
        &self.planes
    }

    /// Triangles stored on this node (leaves only).
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Draw batches stored on this node (leaves only).
    #[inline]
    pub fn batches(&self) -> &[DrawBatch<H>] {
        &self.batches
    }

    #[inline]
    pub fn left(&self) -> Option<&WorldNode<H>> {
        self.left.as_deref()
    }

    #[inline]
    pub fn right(&self) -> Option<&WorldNode<H>> {
        self.right.as_deref()
    }

    /// Returns the existing children, left first.
    pub fn children(&self) -> impl Iterator<Item = &WorldNode<H>> {
        self.left().into_iter().chain(self.right())
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns the total number of triangles stored in this subtree.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() + self.children().map(WorldNode::triangle_count).sum::<usize>()
    }

    /// Returns the number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children().map(WorldNode::node_count).sum::<usize>()
    }

    /// Conservative test of whether `ray` passes through this node's box.
    ///
    /// The ray's line is intersected with each cached face plane and the
    /// node counts as pierced as soon as one hit point falls within that
    /// face's extent. A ray starting inside the box whose line crosses no
    /// face inside its extent is reported as a miss.
    pub fn is_pierced_by(&self, ray: &Ray3) -> bool {
        Face::ALL.iter().zip(&self.planes).any(|(&face, plane)| {
            ray.intersect_plane(plane)
                .is_some_and(|hit| self.bounds.face_contains(face, &hit))
        })
    }

    /// Consumes the subtree, returning every batch handle it owned.
    pub(crate) fn into_handles(self, handles: &mut Vec<H>) {
        handles.extend(self.batches.into_iter().map(DrawBatch::into_handle));
        if let Some(left) = self.left {
            left.into_handles(handles);
        }
        if let Some(right) = self.right {
            right.into_handles(handles);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle::new(Point3::from(a), Point3::from(b), Point3::from(c))
    }

    fn unit_leaf() -> WorldNode<u32> {
        let tris = vec![
            make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            make_triangle([0.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]),
        ];
        let bounds = Aabb::enclosing(&tris).unwrap();
        WorldNode::leaf(0, bounds, tris, Vec::new())
    }

    #[test]
    fn leaf_has_no_children() {
        let leaf = unit_leaf();
        assert!(leaf.is_leaf());
        assert_eq!(leaf.children().count(), 0);
        assert_eq!(leaf.triangle_count(), 2);
        assert_eq!(leaf.node_count(), 1);
    }

    #[test]
    fn internal_counts_children() {
        let bounds = *unit_leaf().bounds();
        let node = WorldNode::internal(0, bounds, Some(unit_leaf()), None);

        assert!(!node.is_leaf());
        assert!(node.triangles().is_empty());
        assert_eq!(node.children().count(), 1);
        assert_eq!(node.node_count(), 2);
        assert_eq!(node.triangle_count(), 2);
        assert!(node.right().is_none());
    }

    #[test]
    fn planes_are_cached_from_bounds() {
        let leaf = unit_leaf();
        assert_eq!(leaf.planes(), &leaf.bounds().face_planes());
    }

    #[test]
    fn ray_through_box_pierces() {
        let leaf = unit_leaf();
        let ray = Ray3::new(Point3::new(0.5, 0.5, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(leaf.is_pierced_by(&ray));

        let diagonal = Ray3::through(Point3::new(-1.0, -1.0, -1.0), Point3::new(2.0, 2.0, 2.0));
        assert!(leaf.is_pierced_by(&diagonal));
    }

    #[test]
    fn ray_beside_box_misses() {
        let leaf = unit_leaf();
        let ray = Ray3::new(Point3::new(3.0, 0.5, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(!leaf.is_pierced_by(&ray));
    }

    #[test]
    fn into_handles_collects_every_leaf() {
        let tris = vec![make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])];
        let mut backend = crate::NullBackend::new();
        let bounds = Aabb::enclosing(&tris).unwrap();

        let mut left_tris = tris.clone();
        let left_batches = crate::batch::batch_triangles(&mut left_tris, &mut backend);
        let mut right_tris = tris.clone();
        let right_batches = crate::batch::batch_triangles(&mut right_tris, &mut backend);

        let node = WorldNode::internal(
            0,
            bounds,
            Some(WorldNode::leaf(1, bounds, left_tris, left_batches)),
            Some(WorldNode::leaf(1, bounds, right_tris, right_batches)),
        );

        let mut handles = Vec::new();
        node.into_handles(&mut handles);
        assert_eq!(handles, vec![0, 1]);
    }
}
