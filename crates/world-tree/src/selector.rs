//! Split-axis strategies for world tree construction.
//!
//! The builder splits an internal node at the midpoint of the axis chosen
//! here, sending triangles to the left or right child by centroid.

use crate::{Aabb, Axis};

/// Strategy for choosing the axis an internal node is split along.
pub trait SplitSelector {
    /// Select the split axis for a node with the given bounds.
    fn select(&self, bounds: &Aabb) -> Axis;
}

/// Splits along the axis with the greatest extent.
///
/// Ties are broken deterministically in the order X, Y, Z, so rebuilding the
/// same soup reproduces the same tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestAxis;

impl SplitSelector for LongestAxis {
    fn select(&self, bounds: &Aabb) -> Axis {
        bounds.longest_axis()
    }
}

impl<F> SplitSelector for F
where
    F: Fn(&Aabb) -> Axis,
{
    fn select(&self, bounds: &Aabb) -> Axis {
        self(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn longest_axis_selects_widest() {
        let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 4.0));
        assert_eq!(LongestAxis.select(&bounds), Axis::Z);
    }

    #[test]
    fn longest_axis_flat_box_ties_to_x() {
        let bounds = Aabb::new(Point3::origin(), Point3::new(2.0, 0.0, 2.0));
        assert_eq!(LongestAxis.select(&bounds), Axis::X);
    }

    #[test]
    fn closures_are_selectors() {
        let always_y = |_: &Aabb| Axis::Y;
        let bounds = Aabb::new(Point3::origin(), Point3::new(9.0, 1.0, 1.0));
        assert_eq!(always_y.select(&bounds), Axis::Y);
    }
}
