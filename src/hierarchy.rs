use crate::merge_node::{MergeNode, NodeRef};
use crate::tree_sink::{summarize, TreeSink, CONTENT_ATTRIBUTE, LEVEL_ATTRIBUTE, SUMMARY_ATTRIBUTE};
use crate::WardError;
use num_traits::Float;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

/// The merge history of a clustering run: a snapshot of the clusters present at every level
/// reached, together with the merge cost recorded when that level was produced.
///
/// A level is identified by its number of clusters, from `n_inputs` (the finest, nothing
/// merged) down to the coarsest level reached, which is 1 when the full tree was grown.
#[derive(Debug, Clone)]
pub struct Hierarchy<E, T> {
    n_inputs: usize,
    // Indexed by n_inputs - level, so the finest level comes first
    snapshots: Vec<Vec<NodeRef<E, T>>>,
    merge_costs: Vec<T>,
}

impl<E, T: Float> Hierarchy<E, T> {
    pub(crate) fn new(inputs: Vec<NodeRef<E, T>>) -> Self {
        Hierarchy {
            n_inputs: inputs.len(),
            snapshots: vec![inputs],
            merge_costs: vec![T::zero()],
        }
    }

    pub(crate) fn record_level(&mut self, active: &[NodeRef<E, T>], merge_cost: T) {
        self.snapshots.push(active.to_vec());
        self.merge_costs.push(merge_cost);
    }

    /// The number of clusters the run started from.
    pub fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    pub fn n_merges(&self) -> usize {
        self.snapshots.len() - 1
    }

    /// The clusters left when merging stopped.
    pub fn clusters(&self) -> &[NodeRef<E, T>] {
        self.snapshots.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn finest_level(&self) -> usize {
        self.n_inputs
    }

    pub fn coarsest_level(&self) -> usize {
        self.n_inputs - self.n_merges()
    }

    /// Whether the tree was grown all the way to a single cluster.
    pub fn is_complete(&self) -> bool {
        self.coarsest_level() == 1
    }

    /// The root of the merge tree, if the tree was fully grown.
    pub fn root(&self) -> Option<&NodeRef<E, T>> {
        if self.is_complete() {
            self.clusters().first()
        } else {
            None
        }
    }

    /// Merge costs of every level reached, finest level first.
    pub fn merge_costs(&self) -> &[T] {
        &self.merge_costs
    }

    /// The clusters present when exactly `level` clusters existed.
    ///
    /// # Returns
    /// * The snapshot, or an out of range error if `level` is outside `[1, n_inputs]` or was
    ///   never reached because merging stopped early.
    pub fn level(&self, level: usize) -> Result<&[NodeRef<E, T>], WardError> {
        let index = self.level_index(level)?;
        Ok(&self.snapshots[index])
    }

    /// The merge cost recorded when `level` was produced. Zero for the finest level.
    pub fn level_merge_cost(&self, level: usize) -> Result<T, WardError> {
        let index = self.level_index(level)?;
        Ok(self.merge_costs[index])
    }

    /// Cuts the fully grown tree by merge cost.
    ///
    /// Scans the levels from the finest towards the coarsest and stops at the first level whose
    /// recorded merge cost exceeds `threshold`, returning the level before it. If no level
    /// exceeds it, the coarsest level (a single cluster) is returned. The finest level always
    /// records a cost of zero, so picking the first level with a cost at or below `threshold`
    /// would never leave it; with monotone costs this returns the coarsest such level instead.
    ///
    /// # Returns
    /// * The clusters of the selected level, an invalid argument error if `threshold` is
    ///   negative or NaN, or an unsupported error if the tree was not grown to one cluster.
    pub fn by_threshold(&self, threshold: T) -> Result<&[NodeRef<E, T>], WardError> {
        if threshold.is_nan() || threshold < T::zero() {
            return Err(WardError::InvalidArgument(String::from(
                "The threshold must be a non-negative number",
            )));
        }
        self.require_complete()?;
        let index = self
            .merge_costs
            .iter()
            .position(|&cost| cost > threshold)
            .map_or(self.merge_costs.len() - 1, |exceeding| exceeding.saturating_sub(1));
        Ok(&self.snapshots[index])
    }

    /// Like [`Hierarchy::by_threshold`], with the threshold given as a fraction of the root's
    /// merge cost, e.g. 0.25 for a quarter of it. The root's cost is the total ESS of the
    /// inputs; the finest level's cost of zero would scale every fraction to zero.
    pub fn by_relative_threshold(&self, percent: T) -> Result<&[NodeRef<E, T>], WardError> {
        self.require_complete()?;
        let root_cost = self.merge_costs.last().copied().unwrap_or_else(T::zero);
        self.by_threshold(root_cost * percent)
    }

    /// Walks the merge trees of the remaining clusters and replays them into `sink`. Every
    /// remaining cluster becomes a child of `root`, then every node's children are added below
    /// it, left before right. Each node gets the [`LEVEL_ATTRIBUTE`], [`SUMMARY_ATTRIBUTE`] and
    /// [`CONTENT_ATTRIBUTE`] attributes.
    pub fn export_tree<S: TreeSink>(&self, sink: &mut S, root: &S::Handle)
    where
        E: Display,
    {
        let levels = self.creation_levels();
        let mut stack: Vec<(&MergeNode<E, T>, S::Handle)> = self
            .clusters()
            .iter()
            .rev()
            .map(|node| (node.as_ref(), root.clone()))
            .collect();

        while let Some((node, parent)) = stack.pop() {
            let handle = sink.add_child(&parent);
            let level = levels
                .get(&(node as *const MergeNode<E, T>))
                .copied()
                .unwrap_or(self.n_inputs);
            let content = node.content_to_string();
            sink.set_attribute(&handle, LEVEL_ATTRIBUTE, &format!("level {level}"));
            sink.set_attribute(&handle, SUMMARY_ATTRIBUTE, &summarize(&content));
            sink.set_attribute(&handle, CONTENT_ATTRIBUTE, &content);

            if let (Some(left), Some(right)) = (node.left(), node.right()) {
                stack.push((right.as_ref(), handle.clone()));
                stack.push((left.as_ref(), handle));
            }
        }
    }

    // Level at which every node recorded in a snapshot first appeared
    fn creation_levels(&self) -> HashMap<*const MergeNode<E, T>, usize> {
        let mut levels = HashMap::new();
        for (index, snapshot) in self.snapshots.iter().enumerate() {
            for node in snapshot {
                levels
                    .entry(Arc::as_ptr(node))
                    .or_insert(self.n_inputs - index);
            }
        }
        levels
    }

    fn level_index(&self, level: usize) -> Result<usize, WardError> {
        if level < 1 || level > self.n_inputs {
            return Err(WardError::OutOfRange(format!(
                "Level {level} is outside of the valid range [1, {}]",
                self.n_inputs
            )));
        }
        if level < self.coarsest_level() {
            return Err(WardError::OutOfRange(format!(
                "Level {level} was never reached, merging stopped at {} clusters",
                self.coarsest_level()
            )));
        }
        Ok(self.n_inputs - level)
    }

    fn require_complete(&self) -> Result<(), WardError> {
        if !self.is_complete() {
            return Err(WardError::Unsupported(format!(
                "Threshold queries need a fully grown tree, but merging stopped at {} clusters",
                self.coarsest_level()
            )));
        }
        Ok(())
    }
}
