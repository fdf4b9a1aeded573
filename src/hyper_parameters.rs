// Defaults for parameters
const TARGET_SIZE_DEFAULT: usize = 1;
const N_WORKERS_DEFAULT: usize = 1;

// Valid minimums/left bounds of parameters
const TARGET_SIZE_MINIMUM: usize = 1;
const N_WORKERS_MINIMUM: usize = 1;
const THRESHOLD_MINIMUM: f64 = 0.0;

/// When the merge loop stops. The two modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoppingCriterion {
    /// Merge until exactly this many clusters remain.
    TargetSize(usize),
    /// Merge while the most recent merge increased the error sum of squares by strictly less
    /// than this threshold.
    Threshold(f64),
}

/// A wrapper around the hyper parameters of Ward clustering. Only needed to change the
/// defaults, which grow the full tree down to a single cluster on one thread. Otherwise use
/// `Ward::default_hyper_params()`.
#[derive(Debug, Clone, PartialEq)]
pub struct WardHyperParams {
    pub(crate) stopping: StoppingCriterion,
    pub(crate) n_workers: usize,
}

/// Builder object to set custom hyper parameters.
pub struct HyperParamBuilder {
    stopping: Option<StoppingCriterion>,
    n_workers: Option<usize>,
}

impl Default for WardHyperParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WardHyperParams {
    /// Enters the builder pattern, allowing custom hyper parameters to be set using
    /// various setter methods.
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn builder() -> HyperParamBuilder {
        HyperParamBuilder {
            stopping: None,
            n_workers: None,
        }
    }

    pub fn stopping_criterion(&self) -> StoppingCriterion {
        self.stopping
    }

    pub fn n_workers(&self) -> usize {
        self.n_workers
    }
}

impl HyperParamBuilder {
    /// Stops merging once this many clusters remain. Replaces any threshold set before.
    /// Defaults to 1, i.e. the full merge tree is grown.
    ///
    /// # Parameters
    /// * target_size - the number of clusters to stop at
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn target_size(mut self, target_size: usize) -> HyperParamBuilder {
        let valid_target_size =
            validate_input_left_bound(target_size, TARGET_SIZE_MINIMUM, "target_size");
        self.stopping = Some(StoppingCriterion::TargetSize(valid_target_size));
        self
    }

    /// Keeps merging while the most recent merge increased the error sum of squares by less
    /// than the threshold. Before the first merge the cheapest available increase is checked
    /// instead. The merge that first reaches the threshold is therefore still applied, and
    /// the loop stops after it. Replaces any target size set before.
    /// Note a tree stopped early this way cannot be queried by threshold afterwards.
    ///
    /// # Parameters
    /// * threshold - merging continues while the last ESS increase is below this value
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn threshold(mut self, threshold: f64) -> HyperParamBuilder {
        let valid_threshold = if threshold.is_nan() {
            tracing::warn!("threshold is NaN. Set to {THRESHOLD_MINIMUM}.");
            THRESHOLD_MINIMUM
        } else {
            validate_input_left_bound(threshold, THRESHOLD_MINIMUM, "threshold")
        };
        self.stopping = Some(StoppingCriterion::Threshold(valid_threshold));
        self
    }

    /// Sets the number of workers searching for the cheapest merge at every step. With more
    /// than one worker a fixed thread pool of that size is built by the first clustering run and
    /// kept by the model for later runs.
    /// Results are identical whatever the number of workers. Defaults to 1.
    ///
    /// # Parameters
    /// * n_workers - the number of worker threads
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn n_workers(mut self, n_workers: usize) -> HyperParamBuilder {
        let valid_n_workers = validate_input_left_bound(n_workers, N_WORKERS_MINIMUM, "n_workers");
        self.n_workers = Some(valid_n_workers);
        self
    }

    /// Finishes the building of the hyper parameter configuration.
    ///
    /// # Returns
    /// * The completed Ward hyper parameter configuration.
    pub fn build(self) -> WardHyperParams {
        WardHyperParams {
            stopping: self
                .stopping
                .unwrap_or(StoppingCriterion::TargetSize(TARGET_SIZE_DEFAULT)),
            n_workers: self.n_workers.unwrap_or(N_WORKERS_DEFAULT),
        }
    }
}

fn validate_input_left_bound<P>(input_param: P, left_bound: P, param: &str) -> P
where
    P: PartialOrd + std::fmt::Display + Copy,
{
    if input_param < left_bound {
        tracing::warn!("{param} ({input_param}) cannot be lower than {left_bound}. Set to {left_bound}.");
        left_bound
    } else {
        input_param
    }
}
