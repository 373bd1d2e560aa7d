//! Terrain following on top of [`WorldTree::first_hit`].

use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::{Ray3, WorldTree};

/// Orientation and height of an entity resting on the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundAlignment {
    /// Rotation whose Y axis is the ground normal under the entity.
    pub rotation: Rotation3<f32>,
    /// Mean height of the three ground contacts.
    pub height: f32,
}

impl GroundAlignment {
    /// Places `pose` on the ground: same horizontal position, aligned rotation.
    pub fn apply(&self, pose: &Isometry3<f32>) -> Isometry3<f32> {
        let t = pose.translation.vector;
        Isometry3::from_parts(
            Translation3::new(t.x, self.height, t.z),
            UnitQuaternion::from_rotation_matrix(&self.rotation),
        )
    }
}

/// Aligns an entity at `pose` to the world geometry underneath it.
///
/// Three ground samples are taken from the entity's local footprint: the front
/// center `(0, 0, max.z)` and the two back corners `(±min.x, 0, min.z)`.
/// They are rotated into the world by `pose`, cast straight down with
/// [`WorldTree::first_hit`] and the contact triangle rebuilds the basis:
/// X runs from the back right to the back left contact, Y is the contact
/// triangle's normal, Z completes the frame.
///
/// Returns `None` when any sample misses the world or the contacts are
/// collinear.
pub fn align_to_ground<H>(
    tree: &WorldTree<H>,
    pose: &Isometry3<f32>,
    footprint_min: &Point3<f32>,
    footprint_max: &Point3<f32>,
) -> Option<GroundAlignment> {
    let front = Vector3::new(0.0, 0.0, footprint_max.z);
    let back_right = Vector3::new(footprint_min.x, 0.0, footprint_min.z);
    let back_left = Vector3::new(-footprint_min.x, 0.0, footprint_min.z);

    let origin = Point3::from(pose.translation.vector);
    let contact = |offset: Vector3<f32>| {
        let sample = origin + pose.rotation * offset;
        tree.first_hit(&Ray3::new(sample, -Vector3::y()))
    };
    let right = contact(back_right)?;
    let left = contact(back_left)?;
    let front = contact(front)?;

    let x = (left - right).try_normalize(f32::EPSILON)?;
    let forward = (front - left).try_normalize(f32::EPSILON)?;
    let y = forward.cross(&x).try_normalize(f32::EPSILON)?;
    let z = x.cross(&y);

    Some(GroundAlignment {
        rotation: Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z])),
        height: (right.y + left.y + front.y) / 3.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NullBackend, Triangle};
    use approx::assert_relative_eq;

    /// A 10 × 10 square centred on the origin, lifted by `height(x)`.
    fn ground(height: impl Fn(f32) -> f32) -> Vec<Triangle> {
        let corner = |x: f32, z: f32| Point3::new(x, height(x), z);
        vec![
            Triangle::new(corner(-5.0, -5.0), corner(-5.0, 5.0), corner(5.0, 5.0)),
            Triangle::new(corner(-5.0, -5.0), corner(5.0, 5.0), corner(5.0, -5.0)),
        ]
    }

    fn build(triangles: &[Triangle]) -> WorldTree<u32> {
        let mut tree = WorldTree::new();
        tree.add_triangles(triangles).unwrap();
        tree.build(&mut NullBackend::new()).unwrap();
        tree
    }

    fn footprint() -> (Point3<f32>, Point3<f32>) {
        (Point3::new(-1.0, 0.0, -1.0), Point3::new(1.0, 2.0, 1.0))
    }

    #[test]
    fn flat_floor_keeps_upright() {
        let tree = build(&ground(|_| 2.0));
        let pose = Isometry3::translation(0.3, 10.0, 0.2);
        let (min, max) = footprint();

        let alignment = align_to_ground(&tree, &pose, &min, &max).unwrap();
        assert_relative_eq!(alignment.rotation, Rotation3::identity(), epsilon = 1e-5);
        assert_relative_eq!(alignment.height, 2.0);

        let placed = alignment.apply(&pose);
        assert_relative_eq!(placed.translation.vector, Vector3::new(0.3, 2.0, 0.2));
    }

    #[test]
    fn flat_floor_preserves_heading() {
        let tree = build(&ground(|_| 0.0));
        let heading = Vector3::y() * std::f32::consts::FRAC_PI_2;
        let pose = Isometry3::new(Vector3::new(0.0, 5.0, 0.0), heading);
        let (min, max) = footprint();

        let alignment = align_to_ground(&tree, &pose, &min, &max).unwrap();
        assert_relative_eq!(
            alignment.rotation,
            pose.rotation.to_rotation_matrix(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn ramp_tilts_up_axis() {
        let tree = build(&ground(|x| 0.5 * x));
        let pose = Isometry3::translation(0.0, 10.0, 0.0);
        let (min, max) = footprint();

        let alignment = align_to_ground(&tree, &pose, &min, &max).unwrap();
        let up = alignment.rotation * Vector3::y();
        assert_relative_eq!(up, Vector3::new(-0.5, 1.0, 0.0).normalize(), epsilon = 1e-5);
        assert_relative_eq!(alignment.height, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn footprint_off_the_world_fails() {
        let tree = build(&ground(|_| 0.0));
        let pose = Isometry3::translation(4.5, 1.0, 0.0);
        let (min, max) = footprint();
        assert!(align_to_ground(&tree, &pose, &min, &max).is_none());
    }
}
