use thiserror::Error;

/// Parameter that failed validation. The messages are what the command line
/// prints, so they stay short and user-facing.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InvalidParam {
    #[error("Invalid number of clusters!")]
    Clusters,
    #[error("Invalid number of points!")]
    Points,
    #[error("Invalid dimension of point!")]
    Dimension,
    #[error("Invalid maximum iteration!")]
    MaxIter,
    #[error("Invalid epsilon!")]
    Epsilon,
    #[error("Invalid number of cores!")]
    Cores,
}

#[derive(Debug, Error, PartialEq)]
pub enum KMeansError {
    #[error("{0}")]
    InvalidConfiguration(InvalidParam),
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },
    #[error("could not allocate {values} values")]
    ResourceExhaustion { values: usize },
    #[error("worker pool: {0}")]
    WorkerPool(String),
}

impl KMeansError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        KMeansError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}

impl From<InvalidParam> for KMeansError {
    fn from(p: InvalidParam) -> Self {
        KMeansError::InvalidConfiguration(p)
    }
}

pub type Result<T> = std::result::Result<T, KMeansError>;
