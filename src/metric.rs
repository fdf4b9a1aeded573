use crate::cluster::Cluster;
use num_traits::{Float, Zero};

/// The metric provider the clustering engine is generic over. It supplies the distance between
/// two elements and a representative "mean" element for a cluster. Together they define the
/// error sum of squares (ESS) that Ward's criterion minimises.
pub trait Metric<E> {
    /// The numeric type of distances and merge costs.
    type Cost: Float;

    /// Distance between two elements. Must be symmetric and non-negative.
    fn distance(&self, a: &E, b: &E) -> Self::Cost;

    /// A representative element, such as the centroid, for the members of `cluster`.
    fn mean_object(&self, cluster: &Cluster<E>) -> E;

    /// Error sum of squares of a cluster: the summed distance of every member to the cluster's
    /// mean object. A single element cluster has an ESS of zero.
    fn ess(&self, cluster: &Cluster<E>) -> Self::Cost {
        if cluster.size() == 1 {
            return Self::Cost::zero();
        }
        let mean = self.mean_object(cluster);
        cluster
            .iter()
            .map(|member| self.distance(member, &mean))
            .fold(Self::Cost::zero(), std::ops::Add::add)
    }
}
