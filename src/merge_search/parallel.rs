#![cfg(feature = "parallel")]
use super::{scan_pairs, MergeCandidate};
use crate::merge_node::NodeRef;
use crate::metric::Metric;
use crate::partition::partition_pairs;
use crate::WardError;
use num_traits::Float;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::AtomicBool;

/// A fixed size pool of worker threads, built the first time a model clusters and reused by
/// every merge step of every run after that.
pub(crate) struct WorkerPool {
    pool: ThreadPool,
    n_workers: usize,
}

impl WorkerPool {
    pub(crate) fn new(n_workers: usize) -> Result<Self, WardError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_workers)
            .thread_name(|n| format!("ward-worker-{n}"))
            .build()
            .map_err(|e| WardError::WorkerPool(e.to_string()))?;
        Ok(Self { pool, n_workers })
    }

    pub(crate) fn n_workers(&self) -> usize {
        self.n_workers
    }
}

pub(crate) struct ParallelMergeSearch<'a, M> {
    metric: &'a M,
    cancel: Option<&'a AtomicBool>,
    pool: &'a WorkerPool,
}

impl<'a, M> ParallelMergeSearch<'a, M> {
    pub(crate) fn new(metric: &'a M, cancel: Option<&'a AtomicBool>, pool: &'a WorkerPool) -> Self {
        Self {
            metric,
            cancel,
            pool,
        }
    }

    /// Splits the pairs between the workers, lets each one scan its own range into its own
    /// result slot and reduces the slots in range order once every task has finished.
    pub(crate) fn find_best_merge<E>(
        &self,
        active: &[NodeRef<E, M::Cost>],
    ) -> Result<Option<MergeCandidate<M::Cost>>, WardError>
    where
        E: Clone + Send + Sync,
        M: Metric<E> + Sync,
        M::Cost: Send + Sync,
    {
        let n_active = active.len();
        let ranges = partition_pairs(n_active, self.pool.n_workers);
        let mut slots: Vec<Option<MergeCandidate<M::Cost>>> = vec![None; ranges.len()];

        let metric = self.metric;
        let cancel = self.cancel;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            // The scope returns only once every spawned task has completed
            self.pool.pool.scope(|scope| {
                for (slot, range) in slots.iter_mut().zip(&ranges) {
                    scope.spawn(move |_| {
                        *slot = scan_pairs(active, metric, range.pairs(n_active), cancel);
                    });
                }
            })
        }));
        if outcome.is_err() {
            return Err(WardError::Cancelled(String::from(
                "a worker task panicked while searching for the cheapest merge",
            )));
        }
        Ok(reduce(slots))
    }
}

fn reduce<T: Float>(slots: Vec<Option<MergeCandidate<T>>>) -> Option<MergeCandidate<T>> {
    slots.into_iter().flatten().fold(None, |best, candidate| {
        if candidate.improves_on(&best) {
            Some(candidate)
        } else {
            best
        }
    })
}
