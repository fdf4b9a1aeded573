use crate::WardError;
use std::fmt::Display;

/// Separator placed between element renderings by [`Cluster::content_to_string`].
pub const CONTENT_SEPARATOR: &str = ", ";

/// Capability of an input element to provide its own label. Used by
/// [`crate::Ward::cluster_labelled`] to seed the labels of the initial singleton clusters.
pub trait Labelled {
    fn label(&self) -> Option<String>;
}

/// An ordered, non-empty bag of elements with an optional label. Insertion order is preserved
/// so that rendering a cluster is stable.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<E> {
    data: Vec<E>,
    label: Option<String>,
}

impl<E> Cluster<E> {
    /// Creates a cluster from a list of elements.
    ///
    /// # Parameters
    /// * `data` - the elements of the cluster. Must not be empty.
    /// * `label` - an optional human readable label.
    ///
    /// # Returns
    /// * The cluster, or an invalid argument error if `data` is empty.
    pub fn new(data: Vec<E>, label: Option<String>) -> Result<Self, WardError> {
        if data.is_empty() {
            return Err(WardError::InvalidArgument(String::from(
                "A cluster must contain at least one element",
            )));
        }
        Ok(Cluster { data, label })
    }

    /// Creates a cluster holding a single element.
    pub fn singleton(datum: E, label: Option<String>) -> Self {
        Cluster {
            data: vec![datum],
            label,
        }
    }

    /// Bounds checked element access.
    pub fn get(&self, index: usize) -> Result<&E, WardError> {
        self.data.get(index).ok_or_else(|| {
            WardError::OutOfRange(format!(
                "Element index {index} is out of range for a cluster of size {}",
                self.data.len()
            ))
        })
    }

    pub fn data(&self) -> &[E] {
        &self.data
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.data.iter()
    }

    /// The number of elements in the cluster, always at least one.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Renders every element with its `Display` form, joined by [`CONTENT_SEPARATOR`] in
    /// insertion order.
    pub fn content_to_string(&self) -> String
    where
        E: Display,
    {
        self.data
            .iter()
            .map(|element| element.to_string())
            .collect::<Vec<_>>()
            .join(CONTENT_SEPARATOR)
    }

    pub(crate) fn concat(first: &Cluster<E>, second: &Cluster<E>) -> Cluster<E>
    where
        E: Clone,
    {
        let mut data = Vec::with_capacity(first.size() + second.size());
        data.extend_from_slice(&first.data);
        data.extend_from_slice(&second.data);
        // An unlabelled side is left out rather than joined as an empty part
        let label = match (&first.label, &second.label) {
            (Some(a), Some(b)) => Some(format!("{a} + {b}")),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        };
        Cluster { data, label }
    }
}

impl<'a, E> IntoIterator for &'a Cluster<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
