//! Procedural level geometry for the visualizer.

use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};
use world_tree::{MaterialId, Triangle};

/// Diffuse material of low ground.
pub const GRASS: MaterialId = MaterialId(1);
/// Diffuse material of high ground.
pub const ROCK: MaterialId = MaterialId(2);
/// Diffuse material of the pillars.
pub const STONE: MaterialId = MaterialId(3);

/// Shape of the generated level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Number of grid cells along each side.
    pub cells: usize,
    /// Width of one grid cell.
    pub spacing: f32,
    /// Peak height of the rolling hills.
    pub amplitude: f32,
    /// Number of box pillars scattered over the terrain.
    pub pillars: usize,
    pub seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            cells: 64,
            spacing: 1.0,
            amplitude: 3.0,
            pillars: 24,
            seed: 7,
        }
    }
}

impl TerrainConfig {
    /// Half the side length of the terrain square, centred on the origin.
    pub fn half_size(&self) -> f32 {
        self.cells as f32 * self.spacing * 0.5
    }

    /// Terrain height at `(x, z)`.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        self.amplitude * ((x * 0.15).sin() * (z * 0.1).cos() + 0.5 * ((x + z) * 0.05).sin())
    }

    fn normal(&self, x: f32, z: f32) -> Vector3<f32> {
        let e = 0.01;
        let dx = self.height(x + e, z) - self.height(x - e, z);
        let dz = self.height(x, z + e) - self.height(x, z - e);
        Vector3::new(-dx, 2.0 * e, -dz).normalize()
    }

    fn vertex(&self, x: f32, z: f32) -> (Point3<f32>, Vector3<f32>, Point2<f32>) {
        let uv = Point2::new(x / self.spacing, z / self.spacing);
        (Point3::new(x, self.height(x, z), z), self.normal(x, z), uv)
    }
}

/// Builds the whole level: the heightfield plus its pillars.
pub fn generate_level(config: &TerrainConfig) -> Vec<Triangle> {
    let mut triangles = generate_heightfield(config);
    triangles.extend(generate_pillars(config));
    triangles
}

/// Triangulates the heightfield, two triangles per cell.
///
/// Cells above half the amplitude use [`ROCK`], the rest [`GRASS`]. Normal
/// maps alternate in a checkerboard.
pub fn generate_heightfield(config: &TerrainConfig) -> Vec<Triangle> {
    let half = config.half_size();
    let mut triangles = Vec::with_capacity(config.cells * config.cells * 2);

    for i in 0..config.cells {
        for j in 0..config.cells {
            let x0 = -half + i as f32 * config.spacing;
            let z0 = -half + j as f32 * config.spacing;
            let (x1, z1) = (x0 + config.spacing, z0 + config.spacing);

            let corners = [
                config.vertex(x0, z0),
                config.vertex(x0, z1),
                config.vertex(x1, z1),
                config.vertex(x1, z0),
            ];
            let peak = corners.iter().map(|c| c.0.y).fold(f32::MIN, f32::max);
            let diffuse = if peak > config.amplitude * 0.5 { ROCK } else { GRASS };
            let normal_map = MaterialId(10 + ((i + j) % 2) as u32);

            for [a, b, c] in [[0, 1, 2], [0, 2, 3]] {
                let (pa, na, ta) = corners[a];
                let (pb, nb, tb) = corners[b];
                let (pc, nc, tc) = corners[c];
                triangles.push(
                    Triangle::new(pa, pb, pc)
                        .with_normals([na, nb, nc])
                        .with_tex_coords([ta, tb, tc])
                        .with_materials(diffuse, normal_map),
                );
            }
        }
    }
    triangles
}

/// Scatters axis-aligned pillars standing on the terrain.
pub fn generate_pillars(config: &TerrainConfig) -> Vec<Triangle> {
    let mut rng = Rng::new(config.seed);
    let reach = config.half_size() * 0.9;

    (0..config.pillars)
        .flat_map(|_| {
            let x = rng.range(-reach, reach);
            let z = rng.range(-reach, reach);
            let height = rng.range(2.0, 8.0);
            let base = config.height(x, z) - 1.0;
            let half = Vector3::new(0.5, height * 0.5, 0.5);
            generate_box(Point3::new(x, base + half.y, z), half, STONE)
        })
        .collect()
}

/// Generates the 12 triangles of an axis-aligned box.
pub fn generate_box(center: Point3<f32>, half: Vector3<f32>, material: MaterialId) -> Vec<Triangle> {
    // 8 corners of the box
    let corners = [
        center + Vector3::new(-half.x, -half.y, -half.z), // 0: left-bottom-back
        center + Vector3::new(half.x, -half.y, -half.z),  // 1: right-bottom-back
        center + Vector3::new(half.x, half.y, -half.z),   // 2: right-top-back
        center + Vector3::new(-half.x, half.y, -half.z),  // 3: left-top-back
        center + Vector3::new(-half.x, -half.y, half.z),  // 4: left-bottom-front
        center + Vector3::new(half.x, -half.y, half.z),   // 5: right-bottom-front
        center + Vector3::new(half.x, half.y, half.z),    // 6: right-top-front
        center + Vector3::new(-half.x, half.y, half.z),   // 7: left-top-front
    ];

    // 6 faces with counter-clockwise winding (viewed from outside)
    let faces: [[usize; 4]; 6] = [
        [4, 5, 6, 7], // front (+Z)
        [1, 0, 3, 2], // back (-Z)
        [0, 4, 7, 3], // left (-X)
        [5, 1, 2, 6], // right (+X)
        [7, 6, 2, 3], // top (+Y)
        [0, 1, 5, 4], // bottom (-Y)
    ];

    faces
        .iter()
        .flat_map(|&[a, b, c, d]| {
            [
                Triangle::new(corners[a], corners[b], corners[c]),
                Triangle::new(corners[a], corners[c], corners[d]),
            ]
        })
        .map(|triangle| {
            let normal = triangle.unit_normal().unwrap_or_else(Vector3::y);
            triangle
                .with_normals([normal; 3])
                .with_materials(material, MaterialId(0))
        })
        .collect()
}

/// Simple seeded random number generator (LCG).
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_f32(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.state >> 40) as f32) / ((1u64 << 24) as f32)
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}
