//! Macroquad mesh store backing the world tree's draw batches.

use std::hash::{Hash, Hasher};

use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use world_tree::{MaterialId, RenderBackend, Triangle};

/// Triangles per mesh so indices stay within `u16`.
const MAX_TRIANGLES_PER_MESH: usize = u16::MAX as usize / 3;

/// Handle to a batch stored in a [`MeshBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(usize);

/// Keeps one list of macroquad meshes per draw batch.
///
/// Released slots are reused by later batches.
#[derive(Default)]
pub struct MeshBackend {
    slots: Vec<Option<Vec<Mesh>>>,
    free: Vec<usize>,
}

impl MeshBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches created and not yet released.
    pub fn live_batches(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Meshes uploaded for `handle`, if it is still live.
    pub fn meshes(&self, handle: &MeshHandle) -> Option<&[Mesh]> {
        self.slots.get(handle.0)?.as_deref()
    }

    /// Draws every mesh of a batch with the active camera.
    pub fn draw(&self, handle: &MeshHandle) {
        for mesh in self.meshes(handle).unwrap_or_default() {
            draw_mesh(mesh);
        }
    }
}

impl RenderBackend for MeshBackend {
    type Batch = MeshHandle;

    fn create_batch(&mut self, triangles: &[Triangle], diffuse: MaterialId, _normal_map: MaterialId) -> MeshHandle {
        let meshes = build_meshes(triangles, material_color(diffuse));
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(meshes);
                MeshHandle(slot)
            }
            None => {
                self.slots.push(Some(meshes));
                MeshHandle(self.slots.len() - 1)
            }
        }
    }

    fn release_batch(&mut self, handle: MeshHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            if slot.take().is_some() {
                self.free.push(handle.0);
            }
        }
    }
}

/// Generates a deterministic color for a material id using hashing.
pub fn material_color(material: MaterialId) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    material.hash(&mut hasher);
    let hash = hasher.finish();

    // Keep colors away from black.
    let r = (((hash >> 16) & 0xFF) as u8).max(40);
    let g = (((hash >> 8) & 0xFF) as u8).max(40);
    let b = ((hash & 0xFF) as u8).max(40);

    Color::from_rgba(r, g, b, 255)
}

/// Converts triangles into unindexed meshes tinted with `tint`.
///
/// Vertex alpha is taken from the triangle's per-vertex alpha.
pub fn build_meshes(triangles: &[Triangle], tint: Color) -> Vec<Mesh> {
    triangles
        .chunks(MAX_TRIANGLES_PER_MESH)
        .map(|chunk| {
            let vertices: Vec<Vertex> = chunk
                .iter()
                .flat_map(|triangle| {
                    let positions = triangle.vertices();
                    let uvs = triangle.tex_coords();
                    let alpha = triangle.alpha();
                    (0..3).map(move |i| {
                        let p = positions[i];
                        let color = Color::new(tint.r, tint.g, tint.b, alpha[i]);
                        Vertex::new2(vec3(p.x, p.y, p.z), vec2(uvs[i].x, uvs[i].y), color)
                    })
                })
                .collect();
            let indices = (0..vertices.len() as u16).collect();

            Mesh {
                vertices,
                indices,
                texture: None,
            }
        })
        .collect()
}
