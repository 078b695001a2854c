//! Progress events emitted by a counting job.
//!
//! The core never prints. It reports what happens to a [`JobObserver`];
//! [`TracingObserver`] turns those reports into `tracing` events.

use tracing::{debug, info, warn};

use super::aggregate::AggregateResult;
use super::config::JobSpec;
use super::core::CountReport;
use super::partition::Partition;
use super::worker::PartialResult;

/// Receives job progress. Every method defaults to a no-op.
///
/// Worker callbacks run on pool threads and aggregator callbacks on the
/// aggregator thread, concurrently with each other.
pub trait JobObserver: Sync {
    fn job_started(&self, _job: &JobSpec, _partitions: &[Partition]) {}

    /// A worker holds a concurrency slot and is about to do I/O.
    fn worker_started(&self, _partition: &Partition) {}

    /// A worker is done and is about to hand its result to the aggregator.
    /// Its slot is released right after.
    fn worker_finished(&self, _result: &PartialResult) {}

    fn result_received(&self, _result: &PartialResult, _running_total: u64) {}

    fn aggregated(&self, _aggregate: &AggregateResult) {}

    fn job_finished(&self, _report: &CountReport) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl JobObserver for NoopObserver {}

/// Observer that logs through `tracing`: job summary at INFO, per-worker
/// and per-result detail at DEBUG, absorbed failures at WARN.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl JobObserver for TracingObserver {
    fn job_started(&self, job: &JobSpec, partitions: &[Partition]) {
        info!(
            path = %job.path.display(),
            file_size = job.file_size,
            buffer_size = job.buffer_size,
            max_threads = job.max_threads,
            partitions = partitions.len(),
            "starting count"
        );
    }

    fn worker_started(&self, partition: &Partition) {
        debug!(
            index = partition.index,
            offset = partition.byte_offset,
            reads = partition.read_count,
            "worker start"
        );
    }

    fn worker_finished(&self, result: &PartialResult) {
        match &result.error {
            Some(e) => warn!(
                index = result.index,
                count = result.count,
                error = %e,
                "worker stopped early"
            ),
            None => debug!(
                index = result.index,
                count = result.count,
                bytes = result.bytes_scanned,
                "worker done"
            ),
        }
    }

    fn result_received(&self, result: &PartialResult, running_total: u64) {
        debug!(index = result.index, count = result.count, running_total, "received");
    }

    fn job_finished(&self, report: &CountReport) {
        info!(
            total = report.total,
            bytes = report.bytes_scanned,
            failures = report.failures.len(),
            elapsed = ?report.elapsed,
            "count finished"
        );
    }
}
