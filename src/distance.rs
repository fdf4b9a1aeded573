use crate::cluster::Cluster;
use crate::metric::Metric;
use num_traits::Float;

/// Ready made metrics for clustering vectors of floating point numbers. The mean object of a
/// cluster is the element-wise mean of its vectors, which is not guaranteed to be an observed
/// data point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DistanceMetric {
    Euclidean,
    /// Squared Euclidean distance. Its ESS is the classical within-cluster variance of Ward's
    /// method.
    SquaredEuclidean,
    Manhattan,
}

impl<T: Float> Metric<Vec<T>> for DistanceMetric {
    type Cost = T;

    fn distance(&self, a: &Vec<T>, b: &Vec<T>) -> T {
        match *self {
            Self::Euclidean => euclidean_distance(a, b),
            Self::SquaredEuclidean => squared_euclidean_distance(a, b),
            Self::Manhattan => manhattan_distance(a, b),
        }
    }

    fn mean_object(&self, cluster: &Cluster<Vec<T>>) -> Vec<T> {
        calc_centroid(cluster.data())
    }
}

pub(crate) fn euclidean_distance<T: Float>(a: &[T], b: &[T]) -> T {
    squared_euclidean_distance(a, b).sqrt()
}

pub(crate) fn squared_euclidean_distance<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| ((*x) - (*y)) * ((*x) - (*y)))
        .fold(T::zero(), std::ops::Add::add)
}

pub(crate) fn manhattan_distance<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| ((*x) - (*y)).abs())
        .fold(T::zero(), std::ops::Add::add)
}

fn calc_centroid<T: Float>(data: &[Vec<T>]) -> Vec<T> {
    let n_dims = data.first().map_or(0, Vec::len);
    let mut count = T::zero();
    let mut element_wise_sum = vec![T::zero(); n_dims];
    for datapoint in data {
        count = count + T::one();
        for (sum, &element) in element_wise_sum.iter_mut().zip(datapoint) {
            *sum = *sum + element;
        }
    }
    for element in element_wise_sum.iter_mut() {
        *element = *element / count;
    }
    element_wise_sum
}
