use crate::cluster::Cluster;
use num_traits::Float;
use std::ops::Deref;
use std::sync::Arc;

/// Shared handle to a node of the merge tree. Parents own their children through it and level
/// snapshots hold further references to the same nodes.
pub type NodeRef<E, T> = Arc<MergeNode<E, T>>;

/// A node of the binary merge tree. Either a leaf (no children) or the merge of exactly two
/// child nodes, in which case its elements are the left child's followed by the right child's.
///
/// A node dereferences to the [`Cluster`] of all elements below it.
#[derive(Debug, Clone)]
pub struct MergeNode<E, T> {
    cluster: Cluster<E>,
    merge_cost: T,
    children: Option<(NodeRef<E, T>, NodeRef<E, T>)>,
    leaf_count: usize,
    depth: usize,
}

impl<E, T: Float> MergeNode<E, T> {
    /// Creates a leaf holding a single datum.
    pub fn leaf(datum: E, label: impl Into<String>) -> Self {
        Self::from_cluster(Cluster::singleton(datum, Some(label.into())))
    }

    /// Creates a leaf from an existing cluster. Its merge cost starts at zero and must be set
    /// with [`MergeNode::with_merge_cost`] if the cluster holds more than one element.
    pub fn from_cluster(cluster: Cluster<E>) -> Self {
        MergeNode {
            cluster,
            merge_cost: T::zero(),
            children: None,
            leaf_count: 1,
            depth: 1,
        }
    }

    /// Combines two nodes into their parent. The merge cost is left at zero: computing it needs
    /// a metric, so it is the caller's job to apply it with [`MergeNode::with_merge_cost`].
    pub fn merge(left: NodeRef<E, T>, right: NodeRef<E, T>) -> Self
    where
        E: Clone,
    {
        let cluster = Cluster::concat(&left.cluster, &right.cluster);
        let leaf_count = left.leaf_count + right.leaf_count;
        let depth = 1 + left.depth.max(right.depth);
        MergeNode {
            cluster,
            merge_cost: T::zero(),
            children: Some((left, right)),
            leaf_count,
            depth,
        }
    }

    pub fn with_merge_cost(mut self, merge_cost: T) -> Self {
        self.merge_cost = merge_cost;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn left(&self) -> Option<&NodeRef<E, T>> {
        self.children.as_ref().map(|(left, _)| left)
    }

    pub fn right(&self) -> Option<&NodeRef<E, T>> {
        self.children.as_ref().map(|(_, right)| right)
    }

    /// The error sum of squares of all elements below this node.
    pub fn merge_cost(&self) -> T {
        self.merge_cost
    }

    /// How much this node's merge increased the error sum of squares over its two children.
    /// A leaf reports its own cost.
    pub fn merge_cost_increase(&self) -> T {
        match &self.children {
            None => self.merge_cost,
            Some((left, right)) => self.merge_cost - (left.merge_cost + right.merge_cost),
        }
    }

    /// Number of leaves in the subtree.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Height of the subtree, a leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn cluster(&self) -> &Cluster<E> {
        &self.cluster
    }

    /// Whether `element` is stored in any leaf of this subtree.
    pub fn contains(&self, element: &E) -> bool
    where
        E: PartialEq,
    {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match &node.children {
                None => {
                    if node.cluster.data().contains(element) {
                        return true;
                    }
                }
                Some((left, right)) => {
                    stack.push(right.as_ref());
                    stack.push(left.as_ref());
                }
            }
        }
        false
    }
}

impl<E, T> Deref for MergeNode<E, T> {
    type Target = Cluster<E>;

    fn deref(&self) -> &Self::Target {
        &self.cluster
    }
}
