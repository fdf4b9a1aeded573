use ward::{Cluster, DistanceMetric, Hierarchy, Metric, Ward, WardError, WardHyperParams};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub fn test_four_point_scenario(n_workers: usize) {
    let hierarchy = cluster_fully(four_points(), n_workers);
    assert_eq!(3, hierarchy.n_merges());

    // The two zeros merge first, at no cost
    let merged = hierarchy.level(3).unwrap().last().unwrap().clone();
    assert_eq!(&[vec![0.0], vec![0.0]], merged.data());
    assert_eq!(0.0, merged.merge_cost_increase());

    let merged = hierarchy.level(2).unwrap().last().unwrap().clone();
    assert_eq!(&[vec![10.0], vec![11.0]], merged.data());
    assert_eq!(1.0, merged.merge_cost_increase());

    // Summed distance of all four points to their mean of 5.25
    let root = hierarchy.root().unwrap();
    assert_eq!(21.0, root.merge_cost());
    assert_eq!(20.0, root.merge_cost_increase());
    assert_eq!(4, root.leaf_count());
    assert_eq!(3, root.depth());
}

pub fn test_partition_invariant(n_workers: usize) {
    let data = scattered_points();
    let n_inputs = data.len();
    let mut expected = data.clone();
    sort_points(&mut expected);

    let hierarchy = cluster_fully(data, n_workers);
    for level in 1..=n_inputs {
        let clusters = hierarchy.level(level).unwrap();
        assert_eq!(level, clusters.len());
        let mut elements: Vec<Vec<f64>> = clusters
            .iter()
            .flat_map(|cluster| cluster.data().to_vec())
            .collect();
        sort_points(&mut elements);
        assert_eq!(expected, elements);
    }
}

pub fn test_termination(n_workers: usize) {
    let data = scattered_points();
    let n_inputs = data.len();
    let hierarchy = cluster_fully(data.clone(), n_workers);
    assert_eq!(n_inputs - 1, hierarchy.n_merges());
    assert_eq!(1, hierarchy.clusters().len());
    assert!(hierarchy.is_complete());

    let root = hierarchy.root().unwrap();
    assert_eq!(n_inputs, root.size());
    assert_eq!(n_inputs, root.leaf_count());
    assert!(data.iter().all(|point| root.contains(point)));
}

pub fn test_cost_monotonicity(n_workers: usize) {
    let data = [0.0, 1.0, 10.0, 13.0, 100.0, 106.0, 1000.0, 1012.0]
        .iter()
        .map(|&x| vec![x])
        .collect();
    let hierarchy = cluster_fully(data, n_workers);
    let costs = hierarchy.merge_costs();
    assert_eq!(8, costs.len());
    assert!(costs.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(&[0.0, 1.0, 3.0, 6.0, 12.0, 22.0], &costs[..6]);
}

pub fn test_target_size(n_workers: usize) {
    let hp = WardHyperParams::builder()
        .target_size(3)
        .n_workers(n_workers)
        .build();
    let hierarchy = Ward::new(DistanceMetric::Euclidean, hp)
        .cluster(scattered_points())
        .unwrap();
    assert_eq!(3, hierarchy.clusters().len());
    assert_eq!(3, hierarchy.coarsest_level());
    assert!(!hierarchy.is_complete());
    assert!(hierarchy.root().is_none());
    assert!(matches!(hierarchy.level(2), Err(WardError::OutOfRange(..))));
    assert!(matches!(hierarchy.by_threshold(1.0), Err(WardError::Unsupported(..))));
    assert!(matches!(
        hierarchy.by_relative_threshold(0.5),
        Err(WardError::Unsupported(..))
    ));
}

pub fn test_threshold_mode(n_workers: usize) {
    let run = |threshold: f64, data: Vec<Vec<f64>>| {
        let hp = WardHyperParams::builder()
            .threshold(threshold)
            .n_workers(n_workers)
            .build();
        Ward::new(DistanceMetric::Manhattan, hp).cluster(data).unwrap()
    };

    // Increases of 0 and 1 are both below 2, so the final merge adding 20 still runs
    let hierarchy = run(2.0, four_points());
    assert_eq!(1, hierarchy.clusters().len());
    assert_eq!(&[0.0, 0.0, 1.0, 21.0], hierarchy.merge_costs());

    // The merge adding 1 reaches the threshold, is applied, and stops the loop
    let hierarchy = run(0.5, four_points());
    assert_eq!(2, hierarchy.clusters().len());
    assert_eq!(&[0.0, 0.0, 1.0], hierarchy.merge_costs());

    let hierarchy = run(1.0, vec![vec![0.0], vec![0.0], vec![10.0]]);
    assert_eq!(1, hierarchy.clusters().len());
    assert_eq!(2, hierarchy.n_merges());

    // Nothing is cheaper than zero, so not even the first merge runs
    let hierarchy = run(0.0, four_points());
    assert_eq!(0, hierarchy.n_merges());
    assert_eq!(4, hierarchy.clusters().len());
}

pub fn test_threshold_queries(n_workers: usize) {
    let hierarchy = cluster_fully(four_points(), n_workers);
    assert_eq!(3, hierarchy.by_threshold(0.0).unwrap().len());
    assert_eq!(3, hierarchy.by_threshold(0.5).unwrap().len());
    assert_eq!(2, hierarchy.by_threshold(1.0).unwrap().len());
    assert_eq!(2, hierarchy.by_threshold(20.9).unwrap().len());
    assert_eq!(1, hierarchy.by_threshold(21.0).unwrap().len());
    assert_eq!(1, hierarchy.by_threshold(1e9).unwrap().len());
    assert!(matches!(hierarchy.by_threshold(-1.0), Err(WardError::InvalidArgument(..))));

    // Fractions of the root cost of 21
    assert_eq!(2, hierarchy.by_relative_threshold(0.5).unwrap().len());
    assert_eq!(3, hierarchy.by_relative_threshold(0.0).unwrap().len());
    assert_eq!(1, hierarchy.by_relative_threshold(1.0).unwrap().len());
    assert!(matches!(
        hierarchy.by_relative_threshold(-0.5),
        Err(WardError::InvalidArgument(..))
    ));
}

pub fn test_level_bounds(n_workers: usize) {
    let hierarchy = cluster_fully(four_points(), n_workers);
    assert!(matches!(hierarchy.level(0), Err(WardError::OutOfRange(..))));
    assert!(matches!(hierarchy.level(5), Err(WardError::OutOfRange(..))));
    assert_eq!(4, hierarchy.level(4).unwrap().len());
    assert_eq!(0.0, hierarchy.level_merge_cost(4).unwrap());
    assert_eq!(21.0, hierarchy.level_merge_cost(1).unwrap());
}

pub fn test_nested_input(n_workers: usize) {
    let hp = WardHyperParams::builder()
        .target_size(2)
        .n_workers(n_workers)
        .build();
    let first = Ward::new(DistanceMetric::Manhattan, hp)
        .cluster(four_points())
        .unwrap();

    let hp = WardHyperParams::builder().n_workers(n_workers).build();
    let second = Ward::new(DistanceMetric::Manhattan, hp)
        .cluster_nodes(first.clusters().to_vec())
        .unwrap();
    assert_eq!(2, second.n_inputs());
    let root = second.root().unwrap();
    assert_eq!(21.0, root.merge_cost());
    assert_eq!(4, root.leaf_count());
    assert_eq!(Some("0 + 1 + 2 + 3"), root.label());
}

pub fn test_cancelled(n_workers: usize) {
    let hp = WardHyperParams::builder().n_workers(n_workers).build();
    let result = Ward::new(DistanceMetric::Euclidean, hp)
        .with_cancel_flag(Arc::new(AtomicBool::new(true)))
        .cluster(scattered_points());
    assert!(matches!(result, Err(WardError::Cancelled(..))));
}

pub fn test_cancelled_during_scan(n_workers: usize) {
    let cancel = Arc::new(AtomicBool::new(false));
    let calls = Arc::new(AtomicUsize::new(0));
    let metric = CancellingLine {
        cancel: Arc::clone(&cancel),
        calls: Arc::clone(&calls),
        raise_after: 4,
    };
    let data: Vec<f64> = (0..12).map(|n| ((n * 7) % 12) as f64 * 1.5).collect();
    let hp = WardHyperParams::builder().n_workers(n_workers).build();
    let result = Ward::new(metric, hp)
        .with_cancel_flag(cancel)
        .cluster(data);
    assert!(matches!(result, Err(WardError::Cancelled(..))));

    // A full scan of the first step evaluates 66 pairs at two distances each. Workers stop
    // at their next row once the flag is up, so at most one row each is scanned.
    let calls = calls.load(Ordering::SeqCst);
    assert!(calls < 132, "{calls} distances computed");
}

pub fn test_empty_data(n_workers: usize) {
    let hp = WardHyperParams::builder().n_workers(n_workers).build();
    let result = Ward::new(DistanceMetric::Euclidean, hp).cluster(Vec::<Vec<f64>>::new());
    assert!(matches!(result, Err(WardError::EmptyDataset)));
}

pub fn test_single_input(n_workers: usize) {
    let hierarchy = cluster_fully(vec![vec![4.0, 2.0]], n_workers);
    assert_eq!(0, hierarchy.n_merges());
    assert!(hierarchy.is_complete());
    assert_eq!(1, hierarchy.by_threshold(0.0).unwrap().len());
}

/// Absolute difference on the real line that raises the cancel flag after a number of
/// distance evaluations.
struct CancellingLine {
    cancel: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    raise_after: usize,
}

impl Metric<f64> for CancellingLine {
    type Cost = f64;

    fn distance(&self, a: &f64, b: &f64) -> f64 {
        if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.raise_after {
            self.cancel.store(true, Ordering::SeqCst);
        }
        (a - b).abs()
    }

    fn mean_object(&self, cluster: &Cluster<f64>) -> f64 {
        cluster.iter().sum::<f64>() / cluster.size() as f64
    }
}

fn cluster_fully(data: Vec<Vec<f64>>, n_workers: usize) -> Hierarchy<Vec<f64>, f64> {
    let hp = WardHyperParams::builder().n_workers(n_workers).build();
    Ward::new(DistanceMetric::Manhattan, hp).cluster(data).unwrap()
}

fn four_points() -> Vec<Vec<f64>> {
    vec![vec![0.0], vec![0.0], vec![10.0], vec![11.0]]
}

fn scattered_points() -> Vec<Vec<f64>> {
    vec![
        vec![1.5, 2.2],
        vec![1.0, 1.1],
        vec![1.2, 1.4],
        vec![0.8, 1.0],
        vec![1.1, 1.0],
        vec![3.7, 4.0],
        vec![3.9, 3.9],
        vec![3.6, 4.1],
        vec![3.8, 3.9],
        vec![4.0, 4.1],
        vec![10.0, 10.0],
    ]
}

fn sort_points(points: &mut [Vec<f64>]) {
    points.sort_by(|a, b| a.partial_cmp(b).expect("Invalid float"));
}
