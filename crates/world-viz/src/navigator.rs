//! World tree navigation utilities for interactive visualization.

use macroquad::prelude::*;
use world_tree::{WorldNode, WorldTree};

use crate::{MeshBackend, MeshHandle};

/// Direction taken at each node in the navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Interactive navigator for exploring the tree structure.
pub struct TreeNavigator {
    path: Vec<Direction>,
}

impl Default for TreeNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    /// Returns the current depth in the tree.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Attempts to navigate to the left child. Returns true if successful.
    pub fn go_left<H>(&mut self, tree: &WorldTree<H>) -> bool {
        self.go(tree, Direction::Left)
    }

    /// Attempts to navigate to the right child. Returns true if successful.
    pub fn go_right<H>(&mut self, tree: &WorldTree<H>) -> bool {
        self.go(tree, Direction::Right)
    }

    fn go<H>(&mut self, tree: &WorldTree<H>, direction: Direction) -> bool {
        let exists = self
            .current_node(tree)
            .and_then(|node| child(node, direction))
            .is_some();
        if exists {
            self.path.push(direction);
        }
        exists
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    /// Returns to the root node.
    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update<H>(&mut self, tree: &WorldTree<H>) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::Z) {
            changed = self.go_left(tree);
        }
        if is_key_pressed(KeyCode::X) {
            changed = self.go_right(tree);
        }
        if is_key_pressed(KeyCode::P) {
            changed = self.go_parent();
        }
        if is_key_pressed(KeyCode::R) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }

        changed
    }

    /// Returns a reference to the current node, if the tree is non-empty.
    pub fn current_node<'a, H>(&self, tree: &'a WorldTree<H>) -> Option<&'a WorldNode<H>> {
        tree.root().and_then(|root| node_at_path(root, &self.path))
    }

    /// Draws every batch in the current subtree and the current node's box.
    pub fn render(&self, tree: &WorldTree<MeshHandle>, backend: &MeshBackend) {
        let Some(node) = self.current_node(tree) else {
            return;
        };

        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            for batch in n.batches() {
                backend.draw(batch.handle());
            }
            stack.extend(n.children());
        }

        draw_bounds(node, YELLOW);
        for child in node.children() {
            draw_bounds(child, ORANGE);
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui<H>(&self, tree: &WorldTree<H>, y_offset: f32) {
        let (triangles, has_left, has_right, is_leaf) = match self.current_node(tree) {
            Some(node) => (
                node.triangle_count(),
                node.left().is_some(),
                node.right().is_some(),
                node.is_leaf(),
            ),
            None => (0, false, false, true),
        };

        let path_str = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(|d| match d {
                    Direction::Left => "L",
                    Direction::Right => "R",
                })
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        draw_text(
            &format!("Subtree: {} triangles", triangles),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Path: {} (depth {})", path_str, self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(
            &format!(
                "Children: {}{}{}",
                if has_left { "[Z] left " } else { "" },
                if has_right { "[X] right " } else { "" },
                if is_leaf { "(leaf)" } else { "" }
            ),
            10.0,
            y_offset + 40.0,
            18.0,
            if is_leaf { ORANGE } else { GREEN },
        );
        draw_text("[P]arent | [R]oot", 10.0, y_offset + 60.0, 16.0, DARKGRAY);
    }
}

fn child<H>(node: &WorldNode<H>, direction: Direction) -> Option<&WorldNode<H>> {
    match direction {
        Direction::Left => node.left(),
        Direction::Right => node.right(),
    }
}

/// Navigates to a node following the path, returns None if path is invalid.
fn node_at_path<'a, H>(root: &'a WorldNode<H>, path: &[Direction]) -> Option<&'a WorldNode<H>> {
    let mut current = root;
    for &direction in path {
        current = child(current, direction)?;
    }
    Some(current)
}

/// Draws a node's bounding box as a wireframe.
pub fn draw_bounds<H>(node: &WorldNode<H>, color: Color) {
    let bounds = node.bounds();
    let c = bounds.center();
    let e = bounds.extent();
    draw_cube_wires(vec3(c.x, c.y, c.z), vec3(e.x, e.y, e.z), color);
}
