use crate::hierarchy::Hierarchy;
use crate::merge_node::{MergeNode, NodeRef};
use crate::merge_search::{is_cancelled, Executor, MergeCandidate};
use crate::validation::DataValidator;
use crate::{Labelled, Metric, StoppingCriterion, WardError, WardHyperParams};
use num_traits::ToPrimitive;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, OnceLock};

type ProgressFn = Box<dyn Fn(usize) + Send + Sync>;

/// Ward's agglomerative hierarchical clustering. Generic over the metric, and through it over
/// the type of the elements and of the merge costs.
pub struct Ward<M> {
    metric: M,
    hp: WardHyperParams,
    progress: Option<ProgressFn>,
    cancel: Option<Arc<AtomicBool>>,
    // Built by the first run, then shared by every later run of this model
    executor: OnceLock<Result<Executor, WardError>>,
}

impl<M> Ward<M> {
    /// Creates an instance of the Ward clustering model using a custom hyper parameter
    /// configuration.
    ///
    /// # Parameters
    /// * `metric` - the metric providing distances and cluster means.
    /// * `hyper_params` - the hyper parameter configuration.
    ///
    /// # Returns
    /// * The Ward model instance.
    ///
    /// # Examples
    /// ```
    ///use ward::{DistanceMetric, Ward, WardHyperParams};
    ///
    ///let config = WardHyperParams::builder()
    ///    .target_size(3)
    ///    .n_workers(4)
    ///    .build();
    ///let clusterer = Ward::new(DistanceMetric::SquaredEuclidean, config);
    /// ```
    pub fn new(metric: M, hyper_params: WardHyperParams) -> Self {
        Ward {
            metric,
            hp: hyper_params,
            progress: None,
            cancel: None,
            executor: OnceLock::new(),
        }
    }

    /// Creates an instance of the Ward clustering model using the default hyper parameters,
    /// which grow the full merge tree on a single thread.
    pub fn default_hyper_params(metric: M) -> Self {
        Ward::new(metric, WardHyperParams::default())
    }

    /// Registers a progress sink, called after every merge with the number of merges done so
    /// far. Only used when clustering to a target size.
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Registers a flag that interrupts clustering once raised. Workers poll it while
    /// scanning, and a run that sees it fails with [`WardError::Cancelled`].
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn hyper_params(&self) -> &WardHyperParams {
        &self.hp
    }

    /// Clusters a list of elements. Each element starts out as a singleton cluster labelled by
    /// its index.
    ///
    /// # Returns
    /// * A result that, if successful, contains the merge hierarchy of the run. An error is
    ///   returned if `data` is empty, if the run was cancelled or if the metric gave no finite
    ///   merge cost at some step.
    ///
    /// # Examples
    /// ```
    ///use ward::{DistanceMetric, Ward};
    ///
    ///let data: Vec<Vec<f64>> = vec![vec![0.0], vec![0.0], vec![10.0], vec![11.0]];
    ///let clusterer = Ward::default_hyper_params(DistanceMetric::Manhattan);
    ///let hierarchy = clusterer.cluster(data).unwrap();
    ///
    ///let two_clusters = hierarchy.level(2).unwrap();
    ///assert_eq!(Some("0 + 1"), two_clusters[0].label());
    ///assert_eq!(Some("2 + 3"), two_clusters[1].label());
    ///assert_eq!(21.0, hierarchy.root().unwrap().merge_cost());
    /// ```
    pub fn cluster<E>(&self, data: Vec<E>) -> Result<Hierarchy<E, M::Cost>, WardError>
    where
        E: Clone + Send + Sync,
        M: Metric<E> + Sync,
        M::Cost: Send + Sync,
    {
        let leaves = data
            .into_iter()
            .enumerate()
            .map(|(n, datum)| Arc::new(MergeNode::leaf(datum, n.to_string())))
            .collect();
        self.cluster_nodes(leaves)
    }

    /// Clusters a list of elements that carry their own labels. Elements without a label are
    /// labelled by their index.
    pub fn cluster_labelled<E>(&self, data: Vec<E>) -> Result<Hierarchy<E, M::Cost>, WardError>
    where
        E: Labelled + Clone + Send + Sync,
        M: Metric<E> + Sync,
        M::Cost: Send + Sync,
    {
        let leaves = data
            .into_iter()
            .enumerate()
            .map(|(n, datum)| {
                let label = Labelled::label(&datum).unwrap_or_else(|| n.to_string());
                Arc::new(MergeNode::leaf(datum, label))
            })
            .collect();
        self.cluster_nodes(leaves)
    }

    /// Clusters existing merge tree nodes, e.g. the result of an earlier clustering, as they
    /// are. Their merge costs are trusted and not recomputed.
    pub fn cluster_nodes<E>(
        &self,
        nodes: Vec<NodeRef<E, M::Cost>>,
    ) -> Result<Hierarchy<E, M::Cost>, WardError>
    where
        E: Clone + Send + Sync,
        M: Metric<E> + Sync,
        M::Cost: Send + Sync,
    {
        DataValidator::new(nodes.len(), &self.hp).validate_input_data()?;
        let executor = self
            .executor
            .get_or_init(|| Executor::new(self.hp.n_workers))
            .as_ref()
            .map_err(Clone::clone)?;
        tracing::info!(
            n_inputs = nodes.len(),
            n_workers = self.hp.n_workers,
            stopping = ?self.hp.stopping,
            "starting ward clustering"
        );

        let mut hierarchy = Hierarchy::new(nodes.clone());
        let mut active = nodes;
        match self.hp.stopping {
            StoppingCriterion::TargetSize(target_size) => {
                while active.len() > target_size {
                    let candidate = self.find_best_merge(executor, &active)?;
                    self.apply_merge(&mut active, candidate, &mut hierarchy);
                    if let Some(progress) = &self.progress {
                        progress(hierarchy.n_merges());
                    }
                }
            }
            StoppingCriterion::Threshold(threshold) => {
                let threshold: M::Cost = num_traits::cast(threshold).ok_or_else(|| {
                    WardError::InvalidArgument(format!(
                        "The threshold {threshold} cannot be represented as a merge cost"
                    ))
                })?;
                // Every merge is gated by the increase of the one before it, the first by the
                // cheapest increase available at the start
                let mut last_increase: Option<M::Cost> = None;
                while active.len() > 1 && last_increase.map_or(true, |last| last < threshold) {
                    let candidate = self.find_best_merge(executor, &active)?;
                    if last_increase.is_none() && candidate.increase >= threshold {
                        break;
                    }
                    last_increase = Some(candidate.increase);
                    self.apply_merge(&mut active, candidate, &mut hierarchy);
                }
            }
        }

        tracing::info!(
            n_merges = hierarchy.n_merges(),
            n_clusters = active.len(),
            "finished ward clustering"
        );
        Ok(hierarchy)
    }

    fn find_best_merge<E>(
        &self,
        executor: &Executor,
        active: &[NodeRef<E, M::Cost>],
    ) -> Result<MergeCandidate<M::Cost>, WardError>
    where
        E: Clone + Send + Sync,
        M: Metric<E> + Sync,
        M::Cost: Send + Sync,
    {
        let cancel = self.cancel.as_deref();
        if is_cancelled(cancel) {
            return Err(cancelled(active.len()));
        }
        let candidate = executor.find_best_merge(active, &self.metric, cancel)?;
        // A scan interrupted part way through may have missed the real minimum
        if is_cancelled(cancel) {
            return Err(cancelled(active.len()));
        }
        candidate.ok_or_else(|| {
            WardError::NonFiniteCost(format!(
                "The metric gave no finite merge cost between any of the {} active clusters",
                active.len()
            ))
        })
    }

    fn apply_merge<E>(
        &self,
        active: &mut Vec<NodeRef<E, M::Cost>>,
        candidate: MergeCandidate<M::Cost>,
        hierarchy: &mut Hierarchy<E, M::Cost>,
    ) where
        E: Clone,
        M: Metric<E>,
    {
        // left < right, so removing right first leaves the left index valid
        let right = active.remove(candidate.right);
        let left = active.remove(candidate.left);
        let merged = MergeNode::merge(left, right).with_merge_cost(candidate.ess);
        tracing::debug!(
            label = merged.label().unwrap_or_default(),
            merge_cost = ?candidate.ess.to_f64(),
            increase = ?candidate.increase.to_f64(),
            n_clusters = active.len() + 1,
            "merged clusters"
        );
        active.push(Arc::new(merged));
        hierarchy.record_level(active, candidate.ess);
    }
}

fn cancelled(n_active: usize) -> WardError {
    WardError::Cancelled(format!("interrupted with {n_active} clusters left"))
}
