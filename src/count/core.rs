use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use super::aggregate::{Aggregator, PartitionFailure};
use super::config::{CountConfig, ErrorPolicy, JobSpec};
use super::error::CountError;
use super::events::{JobObserver, TracingObserver};
use super::limiter::ConcurrencyLimiter;
use super::partition::{plan_partitions, read_count_total};
use super::worker::count_partition;
use crate::common::io::open_noatime;

/// Outcome of a finished job.
#[derive(Debug)]
pub struct CountReport {
    pub total: u64,
    pub file_size: u64,
    pub partitions: usize,
    /// Buffer-read units the file was divided into.
    pub read_count_total: u64,
    pub bytes_scanned: u64,
    /// Failures absorbed under [`ErrorPolicy::BestEffort`]. Non-empty means
    /// `total` may be short.
    pub failures: Vec<PartitionFailure>,
    pub elapsed: Duration,
}

impl CountReport {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Count `delimiter` bytes in `path` across `config.partitions` partitions,
/// running at most `config.max_threads` workers at once. Progress goes to
/// `tracing`.
pub fn count(path: &Path, config: &CountConfig) -> Result<CountReport, CountError> {
    count_with_observer(path, config, &TracingObserver)
}

/// Newline count with default error policy.
pub fn count_lines(
    path: &Path,
    partitions: usize,
    max_threads: usize,
    buffer_size: usize,
) -> Result<u64, CountError> {
    let config = CountConfig::new(partitions, max_threads, buffer_size);
    count(path, &config).map(|report| report.total)
}

/// [`count`] with an explicit observer.
///
/// Only configuration and open/stat problems fail the job before work
/// starts. Later I/O failures either fail the job or are reported in
/// [`CountReport::failures`], depending on `config.error_policy`.
pub fn count_with_observer(
    path: &Path,
    config: &CountConfig,
    observer: &dyn JobObserver,
) -> Result<CountReport, CountError> {
    config.validate()?;
    let start = Instant::now();

    let open_err = |source| CountError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = open_noatime(path).map_err(open_err)?;
    let metadata = file.metadata().map_err(open_err)?;
    if !metadata.file_type().is_file() {
        return Err(CountError::NotRegularFile {
            path: path.to_path_buf(),
        });
    }
    // Workers open their own handles.
    drop(file);

    let job = JobSpec::new(path, metadata.len(), config);
    let partitions = plan_partitions(job.file_size, job.buffer_size, job.partitions);
    observer.job_started(&job, &partitions);

    let busy = partitions.iter().filter(|p| !p.is_empty()).count();
    let limiter = ConcurrencyLimiter::sized_for(job.max_threads, busy)?;
    let (aggregator, tx) = Aggregator::new(partitions.len());
    let expected = aggregator.expected();

    let aggregate = thread::scope(|s| {
        let collector = s.spawn(|| aggregator.collect(observer));

        limiter.run_all(partitions.clone(), |partition| {
            observer.worker_started(&partition);
            let result = count_partition(&job.path, &partition, &job);
            observer.worker_finished(&result);
            // The collector only exits after the last sender is dropped.
            let _ = tx.send(result);
        });
        drop(tx);

        collector
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    });

    if aggregate.received != expected {
        return Err(CountError::ResultMismatch {
            expected,
            received: aggregate.received,
        });
    }

    let mut failures = aggregate.failures;
    if job.error_policy == ErrorPolicy::FailFast && !failures.is_empty() {
        let first = failures.swap_remove(0);
        return Err(CountError::Partition {
            index: first.index,
            offset: partitions[first.index].byte_offset,
            source: first.error,
        });
    }

    let report = CountReport {
        total: aggregate.total,
        file_size: job.file_size,
        partitions: partitions.len(),
        read_count_total: read_count_total(job.file_size, job.buffer_size),
        bytes_scanned: aggregate.bytes_scanned,
        failures,
        elapsed: start.elapsed(),
    };
    observer.job_finished(&report);
    Ok(report)
}
