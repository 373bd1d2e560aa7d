//! Visitor pattern for visibility traversal.
//!
//! Visitors receive the batches of each visible leaf without coupling the
//! traversal to a particular renderer.

use crate::DrawBatch;

/// Visitor for processing draw batches during visibility traversal.
///
/// Common uses include:
/// - Submitting draw calls
/// - Collecting batches for sorting or later submission
/// - Gathering statistics
pub trait BatchVisitor<H> {
    /// Called once per visible leaf with all of its batches.
    fn visit(&mut self, batches: &[DrawBatch<H>]);
}

/// A simple visitor that collects all visited batch handles.
#[derive(Debug)]
pub struct CollectingVisitor<H> {
    collected: Vec<H>,
}

impl<H> Default for CollectingVisitor<H> {
    fn default() -> Self {
        Self {
            collected: Vec::new(),
        }
    }
}

impl<H> CollectingVisitor<H> {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected handles.
    pub fn into_handles(self) -> Vec<H> {
        self.collected
    }

    /// Returns a reference to the collected handles.
    pub fn handles(&self) -> &[H] {
        &self.collected
    }
}

impl<H: Clone> BatchVisitor<H> for CollectingVisitor<H> {
    fn visit(&mut self, batches: &[DrawBatch<H>]) {
        self.collected.extend(batches.iter().map(|b| b.handle().clone()));
    }
}

/// A visitor that calls a closure for each visible leaf's batches.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<H, F> BatchVisitor<H> for FnVisitor<F>
where
    F: FnMut(&[DrawBatch<H>]),
{
    fn visit(&mut self, batches: &[DrawBatch<H>]) {
        (self.func)(batches);
    }
}
