use super::{scan_pairs, MergeCandidate};
use crate::merge_node::NodeRef;
use crate::metric::Metric;
use std::sync::atomic::AtomicBool;

pub(crate) struct SerialMergeSearch<'a, M> {
    metric: &'a M,
    cancel: Option<&'a AtomicBool>,
}

impl<'a, M> SerialMergeSearch<'a, M> {
    pub(crate) fn new(metric: &'a M, cancel: Option<&'a AtomicBool>) -> Self {
        Self { metric, cancel }
    }

    /// Scans every pair in row-major order, the first minimal increase wins.
    pub(crate) fn find_best_merge<E>(
        &self,
        active: &[NodeRef<E, M::Cost>],
    ) -> Option<MergeCandidate<M::Cost>>
    where
        E: Clone,
        M: Metric<E>,
    {
        let n_active = active.len();
        let pairs = (0..n_active).flat_map(move |i| (i + 1..n_active).map(move |j| (i, j)));
        scan_pairs(active, self.metric, pairs, self.cancel)
    }
}
