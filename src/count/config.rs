use std::path::{Path, PathBuf};

use super::error::CountError;

/// Default number of partitions the file is split into.
pub const DEFAULT_PARTITIONS: usize = 2;

/// Default maximum number of concurrently running workers.
pub const DEFAULT_MAX_THREADS: usize = 2;

/// Default size of one buffer-read unit (1 MiB).
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// What a job does when a worker hits an I/O error after partitioning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Keep whatever the failing worker counted and report the failure
    /// alongside the (possibly short) total.
    #[default]
    BestEffort,
    /// Any worker failure fails the whole job.
    FailFast,
}

/// Caller-supplied settings for one counting job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountConfig {
    pub partitions: usize,
    pub max_threads: usize,
    pub buffer_size: usize,
    pub delimiter: u8,
    pub error_policy: ErrorPolicy,
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            partitions: DEFAULT_PARTITIONS,
            max_threads: DEFAULT_MAX_THREADS,
            buffer_size: DEFAULT_BUFFER_SIZE,
            delimiter: b'\n',
            error_policy: ErrorPolicy::BestEffort,
        }
    }
}

impl CountConfig {
    pub fn new(partitions: usize, max_threads: usize, buffer_size: usize) -> Self {
        Self {
            partitions,
            max_threads,
            buffer_size,
            ..Default::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Reject settings the partitioner and limiter cannot work with.
    pub fn validate(&self) -> Result<(), CountError> {
        if self.partitions == 0 {
            return Err(CountError::Config(
                "partition count must be at least 1".to_string(),
            ));
        }
        if self.max_threads == 0 {
            return Err(CountError::Config(
                "thread count must be at least 1".to_string(),
            ));
        }
        if self.buffer_size == 0 {
            return Err(CountError::Config(
                "buffer size must be at least 1 byte".to_string(),
            ));
        }
        Ok(())
    }
}

/// Immutable description of one job, fixed once the target has been stat'd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub path: PathBuf,
    pub file_size: u64,
    pub buffer_size: usize,
    pub partitions: usize,
    pub max_threads: usize,
    pub delimiter: u8,
    pub error_policy: ErrorPolicy,
}

impl JobSpec {
    pub fn new(path: &Path, file_size: u64, config: &CountConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            file_size,
            buffer_size: config.buffer_size,
            partitions: config.partitions,
            max_threads: config.max_threads,
            delimiter: config.delimiter,
            error_policy: config.error_policy,
        }
    }
}
