//! The rendering backend seam.
//!
//! The tree never draws anything itself. Leaf geometry is handed to a
//! [`RenderBackend`] once at build time, and the opaque handles it returns
//! are what the visibility traversal yields.

use crate::{MaterialId, Triangle};

/// Creates and releases draw batches for the world tree.
///
/// Implement this trait to upload leaf geometry to a graphics API. The
/// backend is passed explicitly to [`WorldTree::build`](crate::WorldTree::build)
/// and [`WorldTree::clear`](crate::WorldTree::clear); the tree only stores the
/// returned handles.
pub trait RenderBackend {
    /// Opaque handle for one uploaded run of triangles.
    type Batch;

    /// Uploads a contiguous run of triangles sharing `diffuse` and `normal_map`.
    fn create_batch(
        &mut self,
        triangles: &[Triangle],
        diffuse: MaterialId,
        normal_map: MaterialId,
    ) -> Self::Batch;

    /// Frees a handle previously returned by `create_batch`.
    fn release_batch(&mut self, batch: Self::Batch);
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    type Batch = B::Batch;

    fn create_batch(
        &mut self,
        triangles: &[Triangle],
        diffuse: MaterialId,
        normal_map: MaterialId,
    ) -> Self::Batch {
        (**self).create_batch(triangles, diffuse, normal_map)
    }

    fn release_batch(&mut self, batch: Self::Batch) {
        (**self).release_batch(batch);
    }
}

/// A backend that keeps no GPU state and hands out sequential ids.
///
/// Useful for tools and servers that only need ray queries, and for tests.
#[derive(Debug, Default, Clone)]
pub struct NullBackend {
    next_id: u32,
    live: usize,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches created and not yet released.
    pub fn live_batches(&self) -> usize {
        self.live
    }
}

impl RenderBackend for NullBackend {
    type Batch = u32;

    fn create_batch(&mut self, _: &[Triangle], _: MaterialId, _: MaterialId) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.live += 1;
        id
    }

    fn release_batch(&mut self, _: u32) {
        self.live = self.live.saturating_sub(1);
    }
}
