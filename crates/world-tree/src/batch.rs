//! Material batching of leaf triangles.

use crate::{MaterialId, RenderBackend, Triangle};

/// A backend handle for one run of triangles sharing their materials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawBatch<H> {
    handle: H,
    diffuse: MaterialId,
    normal_map: MaterialId,
    triangle_count: usize,
}

impl<H> DrawBatch<H> {
    /// The backend's handle for this batch.
    #[inline]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    #[inline]
    pub fn diffuse(&self) -> MaterialId {
        self.diffuse
    }

    #[inline]
    pub fn normal_map(&self) -> MaterialId {
        self.normal_map
    }

    /// Number of triangles uploaded in this batch.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub(crate) fn into_handle(self) -> H {
        self.handle
    }
}

/// Sorts `triangles` by diffuse material and uploads one batch per run.
///
/// The sort is stable and keyed on the diffuse id alone. A run ends whenever
/// the diffuse or the normal-map id changes, so triangles sharing a diffuse
/// id but alternating normal maps yield one batch per contiguous run rather
/// than one per material pair.
pub fn batch_triangles<B: RenderBackend>(
    triangles: &mut [Triangle],
    backend: &mut B,
) -> Vec<DrawBatch<B::Batch>> {
    triangles.sort_by_key(Triangle::batch_key);

    triangles
        .chunk_by(|a, b| a.diffuse() == b.diffuse() && a.normal_map() == b.normal_map())
        .map(|run| {
            let diffuse = run[0].diffuse();
            let normal_map = run[0].normal_map();
            log::trace!(
                "batching {} triangles (diffuse {:?}, normal map {:?})",
                run.len(),
                diffuse,
                normal_map
            );
            DrawBatch {
                handle: backend.create_batch(run, diffuse, normal_map),
                diffuse,
                normal_map,
                triangle_count: run.len(),
            }
        })
        .collect()
}
