/// Possible errors that arise while clustering or querying a merge hierarchy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WardError {
    #[error("The dataset provided is empty")]
    EmptyDataset,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Clustering cancelled: {0}")]
    Cancelled(String),

    #[error("Non finite merge cost: {0}")]
    NonFiniteCost(String),

    #[error("Worker pool could not be built: {0}")]
    WorkerPool(String),
}
