//! World tree container, construction and queries.

use std::cell::Cell;
use std::iter::FusedIterator;

use nalgebra::Point3;

use crate::batch::batch_triangles;
use crate::{
    Aabb, BatchVisitor, DrawBatch, Frustum, LongestAxis, Ray3, RenderBackend, Result,
    SplitSelector, Triangle, WorldNode, WorldTreeConfig, WorldTreeError,
};

/// Counters gathered by the most recent visibility traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Visible leaves emitted.
    pub nodes_rendered: usize,
    /// Triangles held by those leaves.
    pub triangles_rendered: usize,
}

/// Spatial index over static world triangles.
///
/// The tree recursively splits the ingested triangle soup at the midpoint of
/// each node's longest axis until nodes are small enough or deep enough to
/// become leaves. Leaves group their triangles into draw batches through a
/// [`RenderBackend`]; the tree then answers frustum visibility and ray
/// queries without touching the backend again.
///
/// # Lifecycle
///
/// ```ignore
/// use world_tree::{Frustum, NullBackend, Ray3, WorldTree};
///
/// let mut backend = NullBackend::new();
/// let mut tree = WorldTree::new();
/// tree.add_triangles(&level_triangles)?;
/// tree.build(&mut backend)?;
///
/// for batch in tree.visible_batches(&frustum) {
///     // draw batch.handle()
/// }
/// let ground = tree.first_hit(&Ray3::new(position, -Vector3::y()));
///
/// tree.clear(&mut backend);
/// ```
///
/// # Synchronization
///
/// The tree has no internal locking and is `!Sync`. Callers sharing it
/// between threads must make sure `build`, `clear` and the queries never run
/// concurrently.
#[derive(Debug)]
pub struct WorldTree<H> {
    config: WorldTreeConfig,
    pending: Vec<Triangle>,
    root: Option<WorldNode<H>>,
    built: bool,
    triangle_count: usize,
    node_count: usize,
    leaf_count: usize,
    batch_count: usize,
    last_render: Cell<RenderStats>,
}

impl<H> Default for WorldTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> WorldTree<H> {
    /// Creates an empty tree with the default configuration.
    pub fn new() -> Self {
        Self {
            config: WorldTreeConfig::default(),
            pending: Vec::new(),
            root: None,
            built: false,
            triangle_count: 0,
            node_count: 0,
            leaf_count: 0,
            batch_count: 0,
            last_render: Cell::new(RenderStats::default()),
        }
    }

    /// Creates an empty tree with a custom configuration.
    pub fn with_config(config: WorldTreeConfig) -> Result<Self> {
        config.validate()?;
        let mut tree = Self::new();
        tree.config = config;
        Ok(tree)
    }

    #[inline]
    pub fn config(&self) -> &WorldTreeConfig {
        &self.config
    }

    /// Appends triangles to the pending buffer consumed by [`build`](Self::build).
    ///
    /// Nothing is deduplicated. Fails with `AlreadyBuilt` once the tree has
    /// been built, with `OutOfMemory` if the buffer cannot grow, and, when
    /// the configuration rejects degenerate triangles, with
    /// `DegenerateTriangle`. On error nothing from `triangles` is appended.
    pub fn add_triangles(&mut self, triangles: &[Triangle]) -> Result<()> {
        if self.built {
            log::warn!("rejected {} triangles: world tree already built", triangles.len());
            return Err(WorldTreeError::AlreadyBuilt);
        }

        if self.config.reject_degenerate {
            if let Some(index) = triangles.iter().position(Triangle::is_degenerate) {
                return Err(WorldTreeError::DegenerateTriangle { index });
            }
        }

        self.pending
            .try_reserve(triangles.len())
            .map_err(|source| WorldTreeError::OutOfMemory {
                requested: triangles.len(),
                source,
            })?;
        self.pending.extend_from_slice(triangles);
        self.triangle_count += triangles.len();
        Ok(())
    }

    /// Builds the tree from every pending triangle, splitting along the longest axis.
    ///
    /// The pending buffer is consumed. Building with no pending triangles
    /// produces an empty tree, which is still considered built.
    pub fn build<B>(&mut self, backend: &mut B) -> Result<()>
    where
        B: RenderBackend<Batch = H>,
    {
        self.build_with(backend, &LongestAxis)
    }

    /// Builds the tree using the provided [`SplitSelector`] to choose split axes.
    pub fn build_with<B, S>(&mut self, backend: &mut B, selector: &S) -> Result<()>
    where
        B: RenderBackend<Batch = H>,
        S: SplitSelector,
    {
        if self.built {
            log::warn!("world tree build requested twice without clear");
            return Err(WorldTreeError::AlreadyBuilt);
        }

        let triangles = std::mem::take(&mut self.pending);
        let mut builder = Builder {
            config: self.config,
            selector,
            backend,
            nodes: 0,
            leaves: 0,
            batches: 0,
        };
        self.root = builder.build_node(triangles, 0);
        self.node_count = builder.nodes;
        self.leaf_count = builder.leaves;
        self.batch_count = builder.batches;
        self.built = true;

        log::debug!(
            "built world tree: {} triangles, {} nodes, {} leaves, {} batches",
            self.triangle_count,
            self.node_count,
            self.leaf_count,
            self.batch_count
        );
        Ok(())
    }

    /// Releases the whole tree and any pending triangles.
    ///
    /// Every leaf's batch handle is returned to `backend`. All counters go
    /// back to zero and the tree can be filled and built again.
    pub fn clear<B>(&mut self, backend: &mut B)
    where
        B: RenderBackend<Batch = H>,
    {
        let mut handles = Vec::with_capacity(self.batch_count);
        if let Some(root) = self.root.take() {
            root.into_handles(&mut handles);
        }
        let released = handles.len();
        for handle in handles {
            backend.release_batch(handle);
        }

        self.pending = Vec::new();
        self.built = false;
        self.triangle_count = 0;
        self.node_count = 0;
        self.leaf_count = 0;
        self.batch_count = 0;
        self.last_render.set(RenderStats::default());

        log::info!("cleared world tree, released {} draw batches", released);
    }

    /// Returns `true` once [`build`](Self::build) succeeded and until [`clear`](Self::clear).
    #[inline]
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Returns `true` if the tree has no root node.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    pub fn root(&self) -> Option<&WorldNode<H>> {
        self.root.as_ref()
    }

    /// Bounding box of the whole world, if built and non-empty.
    pub fn bounds(&self) -> Option<&Aabb> {
        self.root.as_ref().map(WorldNode::bounds)
    }

    /// Total number of ingested triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Triangles waiting for the next build.
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of draw batches owned by the leaves.
    #[inline]
    pub fn batch_count(&self) -> usize {
        self.batch_count
    }

    /// Statistics of the most recent visibility traversal.
    #[inline]
    pub fn last_render_stats(&self) -> RenderStats {
        self.last_render.get()
    }

    /// Iterates over every leaf, depth first, left before right.
    pub fn leaves(&self) -> impl Iterator<Item = &WorldNode<H>> {
        let mut stack: Vec<&WorldNode<H>> = self.root.iter().collect();
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                if node.is_leaf() {
                    return Some(node);
                }
                stack.extend(node.right());
                stack.extend(node.left());
            }
            None
        })
    }

    /// Lazily yields the leaves whose boxes survive the frustum test.
    ///
    /// The root is always treated as visible. Every other node is tested
    /// against all six planes and skipped with its whole subtree when it
    /// lies outside any of them. Leaves come out in depth-first pre-order,
    /// left before right.
    ///
    /// Render statistics are reset here and accumulate as leaves are yielded.
    pub fn visible_leaves<'a>(&'a self, frustum: &'a Frustum) -> VisibleLeaves<'a, H> {
        self.last_render.set(RenderStats::default());
        VisibleLeaves {
            frustum,
            stack: self.root.iter().collect(),
            stats: &self.last_render,
        }
    }

    /// Lazily yields the draw batches of every visible leaf.
    pub fn visible_batches<'a>(&'a self, frustum: &'a Frustum) -> impl Iterator<Item = &'a DrawBatch<H>> {
        self.visible_leaves(frustum).flat_map(WorldNode::batches)
    }

    /// Pushes the batches of each visible leaf to `visitor`.
    pub fn traverse_visible<V: BatchVisitor<H>>(&self, frustum: &Frustum, visitor: &mut V) {
        for leaf in self.visible_leaves(frustum) {
            visitor.visit(leaf.batches());
        }
    }

    /// Finds an intersection between the ray's line and the world.
    ///
    /// The result is the first hit found by a depth-first, left-then-right
    /// walk, testing leaf triangles in stored order. It is **not**
    /// necessarily the hit closest to the ray origin, and hits behind the
    /// origin count too.
    pub fn first_hit(&self, ray: &Ray3) -> Option<Point3<f32>> {
        self.root.as_ref().and_then(|root| first_hit_node(root, ray))
    }
}

impl<H> Drop for WorldTree<H> {
    fn drop(&mut self) {
        if self.batch_count > 0 {
            log::warn!(
                "world tree dropped with {} live draw batches; call clear() to release them",
                self.batch_count
            );
        }
    }
}

/// Iterator over the visible leaves of a [`WorldTree`].
///
/// Created by [`WorldTree::visible_leaves`].
pub struct VisibleLeaves<'a, H> {
    frustum: &'a Frustum,
    stack: Vec<&'a WorldNode<H>>,
    stats: &'a Cell<RenderStats>,
}

impl<'a, H> Iterator for VisibleLeaves<'a, H> {
    type Item = &'a WorldNode<H>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if node.depth() > 0 && self.frustum.culls(node.bounds()) {
                continue;
            }

            if node.is_leaf() {
                let mut stats = self.stats.get();
                stats.nodes_rendered += 1;
                stats.triangles_rendered += node.triangles().len();
                self.stats.set(stats);
                return Some(node);
            }

            self.stack.extend(node.right());
            self.stack.extend(node.left());
        }
        None
    }
}

impl<H> FusedIterator for VisibleLeaves<'_, H> {}

/// Recursive construction state shared across one build.
struct Builder<'a, B, S> {
    config: WorldTreeConfig,
    selector: &'a S,
    backend: &'a mut B,
    nodes: usize,
    leaves: usize,
    batches: usize,
}

impl<B: RenderBackend, S: SplitSelector> Builder<'_, B, S> {
    /// Recursively builds a node from a list of triangles.
    fn build_node(&mut self, mut triangles: Vec<Triangle>, depth: u16) -> Option<WorldNode<B::Batch>> {
        let bounds = Aabb::enclosing(&triangles)?;
        self.nodes += 1;

        if self.config.is_leaf(depth, triangles.len()) {
            let batches = batch_triangles(&mut triangles, &mut *self.backend);
            self.leaves += 1;
            self.batches += batches.len();
            return Some(WorldNode::leaf(depth, bounds, triangles, batches));
        }

        // Split by centroid around the midpoint of the chosen axis.
        let axis = self.selector.select(&bounds).index();
        let midpoint = bounds.center()[axis];
        let (left, right): (Vec<Triangle>, Vec<Triangle>) = triangles
            .into_iter()
            .partition(|t| t.centroid()[axis] < midpoint);

        // Empty halves come back as None and are pruned.
        let left = self.build_node(left, depth + 1);
        let right = self.build_node(right, depth + 1);
        Some(WorldNode::internal(depth, bounds, left, right))
    }
}

/// Recursively searches a node subtree for the first ray hit.
fn first_hit_node<H>(node: &WorldNode<H>, ray: &Ray3) -> Option<Point3<f32>> {
    if !node.is_pierced_by(ray) {
        return None;
    }

    if node.is_leaf() {
        return node
            .triangles()
            .iter()
            .find_map(|triangle| ray.intersect_triangle(triangle));
    }

    node.left()
        .and_then(|left| first_hit_node(left, ray))
        .or_else(|| node.right().and_then(|right| first_hit_node(right, ray)))
}
