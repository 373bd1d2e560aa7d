//! Axis-aligned bounding boxes and their face planes.

use nalgebra::{Point3, Vector3};

use crate::{Plane3D, Triangle};

/// One of the three cardinal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in tie-break preference order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index of the axis into a point or vector (0, 1 or 2).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Faces of a box, in the order their planes are cached on each node.
///
/// Left/Right lie in the YZ plane, Bottom/Top in XZ, Near/Far in XY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Left,
    Right,
    Bottom,
    Top,
    Near,
    Far,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Left,
        Face::Right,
        Face::Bottom,
        Face::Top,
        Face::Near,
        Face::Far,
    ];

    /// Outward normal used for this face's plane.
    ///
    /// Near and Far share the +Z normal. Far is anchored on the minimum z, so
    /// its normal points into the box rather than out of it.
    pub fn normal(self) -> Vector3<f32> {
        match self {
            Face::Left => Vector3::new(-1.0, 0.0, 0.0),
            Face::Right => Vector3::new(1.0, 0.0, 0.0),
            Face::Bottom => Vector3::new(0.0, -1.0, 0.0),
            Face::Top => Vector3::new(0.0, 1.0, 0.0),
            Face::Near | Face::Far => Vector3::new(0.0, 0.0, 1.0),
        }
    }

    /// The axis the face is perpendicular to.
    pub fn axis(self) -> Axis {
        match self {
            Face::Left | Face::Right => Axis::X,
            Face::Bottom | Face::Top => Axis::Y,
            Face::Near | Face::Far => Axis::Z,
        }
    }

    /// The two axes spanning the face.
    pub fn span_axes(self) -> (Axis, Axis) {
        match self.axis() {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// Whether the face plane passes through the box maximum.
    fn anchored_on_max(self) -> bool {
        matches!(self, Face::Right | Face::Top | Face::Near)
    }
}

/// An axis-aligned bounding box with a cached center.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    min: Point3<f32>,
    max: Point3<f32>,
    center: Point3<f32>,
}

impl Aabb {
    /// Creates a box from its corners. The center is the midpoint.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        let center = Point3::from((max - min) * 0.5 + min.coords);
        Self { min, max, center }
    }

    /// Computes the tightest box around every vertex of `triangles`.
    ///
    /// Returns `None` for an empty slice.
    pub fn enclosing(triangles: &[Triangle]) -> Option<Self> {
        let first = triangles.first()?.vertices()[0];
        let (min, max) = triangles
            .iter()
            .flat_map(|t| t.vertices().iter())
            .fold((first, first), |(min, max), v| (min.inf(v), max.sup(v)));
        Some(Self::new(min, max))
    }

    #[inline]
    pub fn min(&self) -> Point3<f32> {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Point3<f32> {
        self.max
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    /// Full size of the box along each axis.
    #[inline]
    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Half the size of the box along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vector3<f32> {
        self.extent() * 0.5
    }

    /// Returns the axis with the greatest extent. Ties go to X, then Y, then Z.
    pub fn longest_axis(&self) -> Axis {
        let extent = self.extent();
        Axis::ALL
            .into_iter()
            .fold(Axis::X, |best, axis| {
                if extent[axis.index()] > extent[best.index()] {
                    axis
                } else {
                    best
                }
            })
    }

    /// Plane for one face, in `normal · p + d = 0` form with `d = -normal · anchor`.
    pub fn face_plane(&self, face: Face) -> Plane3D {
        let anchor = if face.anchored_on_max() {
            self.max
        } else {
            self.min
        };
        Plane3D::new(face.normal(), (-face.normal()).dot(&anchor.coords))
    }

    /// Planes for all six faces, indexed in [`Face::ALL`] order.
    pub fn face_planes(&self) -> [Plane3D; 6] {
        Face::ALL.map(|face| self.face_plane(face))
    }

    /// Returns `true` if `point` lies within the face's 2D extent (bounds inclusive).
    ///
    /// The coordinate along the face's own axis is ignored.
    pub fn face_contains(&self, face: Face, point: &Point3<f32>) -> bool {
        let (u, v) = face.span_axes();
        let (u, v) = (u.index(), v.index());
        point[u] >= self.min[u]
            && point[u] <= self.max[u]
            && point[v] >= self.min[v]
            && point[v] <= self.max[v]
    }
}
