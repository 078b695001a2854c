use std::io;
use std::path::PathBuf;

/// Errors surfaced by a counting job.
#[derive(Debug, thiserror::Error)]
pub enum CountError {
    /// Invalid job settings, detected before the file is touched.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The target could not be opened or stat'd. No work was started.
    #[error("{}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target is not a seekable regular file.
    #[error("{}: not a regular file", path.display())]
    NotRegularFile { path: PathBuf },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A worker failed while reading its partition (fail-fast policy only).
    #[error("partition {index} at offset {offset}: {source}")]
    Partition {
        index: usize,
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// The aggregator did not see exactly one result per partition.
    #[error("expected {expected} partial results, received {received}")]
    ResultMismatch { expected: usize, received: usize },
}

impl CountError {
    /// The underlying I/O error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            CountError::Open { source, .. } | CountError::Partition { source, .. } => Some(source),
            _ => None,
        }
    }
}
