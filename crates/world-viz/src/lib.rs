//! Shared visualization utilities for the world tree viewer.

use macroquad::prelude::*;
use nalgebra::{Matrix4, Point2, Point3};
use world_tree::{Frustum, Ray3};

mod backend;
pub mod config;
pub mod navigator;
pub mod terrain;

pub use backend::{build_meshes, material_color, MeshBackend, MeshHandle};
pub use config::{CameraConfig, ConfigError, VizConfig};
pub use navigator::TreeNavigator;
pub use terrain::{generate_level, TerrainConfig};

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    /// Minimum distance from target
    pub min_distance: f32,
    /// Maximum distance from target
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Creates a new orbit camera with the given configuration.
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 5.0,
            min_distance: 10.0,
            max_distance: 200.0,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.distance, config.yaw, config.pitch)
    }

    /// Sets the zoom configuration (speed and distance limits).
    pub fn with_zoom(mut self, speed: f32, min: f32, max: f32) -> Self {
        self.zoom_speed = speed;
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        // Mouse drag for rotation
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        // Clamp pitch to avoid gimbal lock
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        // Mouse wheel for zoom
        let scroll = mouse_wheel().1;
        self.distance -= scroll * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        // Arrow keys for rotation
        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }

    /// Returns the eye point as a nalgebra Point3 for tree queries.
    pub fn eye_point(&self) -> Point3<f32> {
        let pos = self.position();
        Point3::new(pos.x, pos.y, pos.z)
    }

    /// Combined projection and view matrix of the current window.
    pub fn view_projection(&self) -> Matrix4<f32> {
        to_nalgebra(&self.to_camera3d().matrix())
    }

    /// Culling frustum matching what the camera sees.
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection())
    }

    /// Picking ray through the mouse cursor.
    pub fn mouse_ray(&self) -> Option<Ray3> {
        let (x, y) = mouse_position();
        let ndc = Point2::new(2.0 * x / screen_width() - 1.0, 1.0 - 2.0 * y / screen_height());
        Ray3::from_screen(&self.view_projection(), ndc, self.eye_point())
    }
}

/// Converts a glam matrix to nalgebra. Both are column-major.
pub fn to_nalgebra(m: &Mat4) -> Matrix4<f32> {
    Matrix4::from_column_slice(&m.to_cols_array())
}

/// Converts a nalgebra point to a macroquad vector.
pub fn to_vec3(p: &Point3<f32>) -> Vec3 {
    vec3(p.x, p.y, p.z)
}
