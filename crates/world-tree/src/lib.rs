//! Spatial index over static world geometry.
//!
//! A [`WorldTree`] ingests the triangle soup of a level once, partitions it
//! into a binary hierarchy of axis-aligned boxes and groups each leaf's
//! triangles into material batches. It then answers two queries every frame:
//!
//! - which batches are potentially visible from a camera [`Frustum`]
//! - where a [`Ray3`] first meets the world geometry
//!
//! # Example
//!
//! ```ignore
//! use world_tree::{Frustum, NullBackend, Ray3, Triangle, WorldTree};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut backend = NullBackend::new();
//! let mut tree = WorldTree::new();
//! tree.add_triangles(&triangles)?;
//! tree.build(&mut backend)?;
//!
//! let frustum = Frustum::from_view_projection(&view_projection);
//! for batch in tree.visible_batches(&frustum) {
//!     // submit batch.handle()
//! }
//!
//! let down = Ray3::new(Point3::new(0.0, 50.0, 0.0), -Vector3::y());
//! let ground = tree.first_hit(&down);
//! ```
//!
//! # Architecture
//!
//! - [`WorldTree`]: the container, builder and query entry points
//! - [`WorldNode`]: internal nodes hold children, leaves hold triangles and batches
//! - [`RenderBackend`]: the seam through which leaf geometry is uploaded
//! - [`SplitSelector`]: strategy trait for choosing split axes
//! - [`BatchVisitor`]: visitor trait for push-style visibility traversal

pub mod align;
mod aabb;
mod backend;
pub mod batch;
mod config;
mod error;
mod frustum;
mod node;
mod plane;
mod ray;
mod selector;
mod tree;
mod triangle;
mod visitor;

pub use aabb::{Aabb, Axis, Face};
pub use align::{align_to_ground, GroundAlignment};
pub use backend::{NullBackend, RenderBackend};
pub use batch::DrawBatch;
pub use config::{WorldTreeConfig, LEAF_THRESHOLD, MAX_DEPTH, MAX_DEPTH_LIMIT};
pub use error::{Result, WorldTreeError};
pub use frustum::{effective_radius, Frustum};
pub use node::WorldNode;
pub use plane::Plane3D;
pub use ray::Ray3;
pub use selector::{LongestAxis, SplitSelector};
pub use tree::{RenderStats, VisibleLeaves, WorldTree};
pub use triangle::{MaterialId, Triangle};
pub use visitor::{BatchVisitor, CollectingVisitor, FnVisitor};
