//! Ward's agglomerative hierarchical clustering in Rust. Generic over the element type, the
//! metric and the floating point type of merge costs.
//!
//! Starting from one cluster per input, Ward's method repeatedly merges the pair of clusters
//! whose combination least increases the total within-cluster error sum of squares (ESS),
//! until a target number of clusters remains or a merge increases the ESS past a threshold.
//! Every intermediate level is kept, so the resulting [`Hierarchy`] can be cut at any number
//! of clusters or at a merge cost threshold after the fact.
//!
//! The notion of distance is injected through the [`Metric`] trait, which supplies the
//! distance between two elements and a representative mean element for a cluster. Vectors of
//! floats can use the ready made [`DistanceMetric`]s.
//!
//! With the `parallel` feature (on by default) the search for the cheapest merge can be spread
//! over a fixed pool of worker threads. The merges chosen do not depend on the number of
//! workers.
//!
//! # Examples
//! ```
//!use ward::{DistanceMetric, Ward, WardHyperParams};
//!
//!let data: Vec<Vec<f32>> = vec![
//!    vec![1.5, 2.2],
//!    vec![1.0, 1.1],
//!    vec![1.2, 1.4],
//!    vec![0.8, 1.0],
//!    vec![3.7, 4.0],
//!    vec![3.9, 3.9],
//!    vec![3.6, 4.1],
//!    vec![10.0, 10.0],
//!];
//!let hyper_params = WardHyperParams::builder().n_workers(2).build();
//!let clusterer = Ward::new(DistanceMetric::SquaredEuclidean, hyper_params);
//!let hierarchy = clusterer.cluster(data).unwrap();
//!
//!let clusters = hierarchy.level(3).unwrap();
//!let mut sizes: Vec<usize> = clusters.iter().map(|cluster| cluster.size()).collect();
//!sizes.sort();
//!assert_eq!(vec![1, 3, 4], sizes);
//! ```
//!
//! # References
//! * [Ward, J. H. Hierarchical Grouping to Optimize an Objective Function.](https://doi.org/10.1080/01621459.1963.10500845)

pub use crate::cluster::{Cluster, Labelled, CONTENT_SEPARATOR};
pub use crate::distance::DistanceMetric;
pub use crate::error::WardError;
pub use crate::hierarchy::Hierarchy;
pub use crate::hyper_parameters::{HyperParamBuilder, StoppingCriterion, WardHyperParams};
pub use crate::merge_node::{MergeNode, NodeRef};
pub use crate::metric::Metric;
pub use crate::partition::{partition_pairs, PairIter, PairRange};
pub use crate::tree_sink::{TreeSink, CONTENT_ATTRIBUTE, LEVEL_ATTRIBUTE, SUMMARY_ATTRIBUTE};
pub use crate::ward::Ward;

mod cluster;
mod distance;
mod error;
mod hierarchy;
mod hyper_parameters;
mod merge_node;
mod merge_search;
mod metric;
mod partition;
mod tree_sink;
mod validation;
mod ward;
