use crate::cluster::Cluster;
use crate::merge_node::NodeRef;
use crate::metric::Metric;
use crate::WardError;
use num_traits::Float;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
use crate::merge_search::parallel::{ParallelMergeSearch, WorkerPool};
use crate::merge_search::serial::SerialMergeSearch;

#[cfg(feature = "parallel")]
pub(crate) mod parallel;
pub(crate) mod serial;

/// The cheapest merge found among a set of pairs of active clusters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MergeCandidate<T> {
    pub(crate) left: usize,
    pub(crate) right: usize,
    pub(crate) ess: T,
    pub(crate) increase: T,
}

impl<T: Float> MergeCandidate<T> {
    /// Only a strictly lower increase wins, so the first candidate found keeps exact ties.
    pub(crate) fn improves_on(&self, best: &Option<MergeCandidate<T>>) -> bool {
        match best {
            None => true,
            Some(best) => self.increase < best.increase,
        }
    }
}

/// How the per step search is executed. The worker pool is built once per model and reused by
/// every run.
pub(crate) enum Executor {
    Serial,
    #[cfg(feature = "parallel")]
    Parallel(WorkerPool),
}

impl Executor {
    pub(crate) fn new(n_workers: usize) -> Result<Self, WardError> {
        if n_workers <= 1 {
            return Ok(Executor::Serial);
        }
        #[cfg(feature = "parallel")]
        let executor = Executor::Parallel(WorkerPool::new(n_workers)?);
        #[cfg(not(feature = "parallel"))]
        let executor = {
            tracing::warn!(
                n_workers,
                "the parallel feature is disabled, clustering with a single worker"
            );
            Executor::Serial
        };
        Ok(executor)
    }

    /// Finds the pair of active clusters whose merge least increases the ESS. The parallel
    /// pool is only used once there are more active clusters than workers.
    pub(crate) fn find_best_merge<E, M>(
        &self,
        active: &[NodeRef<E, M::Cost>],
        metric: &M,
        cancel: Option<&AtomicBool>,
    ) -> Result<Option<MergeCandidate<M::Cost>>, WardError>
    where
        E: Clone + Send + Sync,
        M: Metric<E> + Sync,
        M::Cost: Send + Sync,
    {
        match self {
            #[cfg(feature = "parallel")]
            Executor::Parallel(pool) if active.len() > pool.n_workers() => {
                ParallelMergeSearch::new(metric, cancel, pool).find_best_merge(active)
            }
            _ => Ok(SerialMergeSearch::new(metric, cancel).find_best_merge(active)),
        }
    }
}

pub(crate) fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

/// Evaluates merging active clusters `i` and `j`. Pairs whose cost is not finite are skipped.
pub(crate) fn evaluate_pair<E, M>(
    active: &[NodeRef<E, M::Cost>],
    metric: &M,
    i: usize,
    j: usize,
) -> Option<MergeCandidate<M::Cost>>
where
    E: Clone,
    M: Metric<E>,
{
    let (left, right) = (&active[i], &active[j]);
    let merged = Cluster::concat(left.cluster(), right.cluster());
    let ess = metric.ess(&merged);
    let increase = ess - (left.merge_cost() + right.merge_cost());
    if !increase.is_finite() {
        return None;
    }
    Some(MergeCandidate {
        left: i,
        right: j,
        ess,
        increase,
    })
}

/// Scans `pairs` in order, keeping the first minimal increase. Stops early, checking once per
/// row, if the cancel flag is raised.
pub(crate) fn scan_pairs<E, M, I>(
    active: &[NodeRef<E, M::Cost>],
    metric: &M,
    pairs: I,
    cancel: Option<&AtomicBool>,
) -> Option<MergeCandidate<M::Cost>>
where
    E: Clone,
    M: Metric<E>,
    I: Iterator<Item = (usize, usize)>,
{
    let mut best = None;
    let mut current_row = None;
    for (i, j) in pairs {
        if current_row != Some(i) {
            current_row = Some(i);
            if is_cancelled(cancel) {
                return best;
            }
        }
        if let Some(candidate) = evaluate_pair(active, metric, i, j) {
            if candidate.improves_on(&best) {
                best = Some(candidate);
            }
        }
    }
    best
}
