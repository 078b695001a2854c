use std::io;

use crossbeam::channel::{self, Receiver, Sender};

use super::events::JobObserver;
use super::worker::PartialResult;

/// A partition whose worker stopped on an I/O error.
#[derive(Debug)]
pub struct PartitionFailure {
    pub index: usize,
    pub error: io::Error,
}

/// Sum of every partial result of a job.
#[derive(Debug, Default)]
pub struct AggregateResult {
    pub total: u64,
    pub received: usize,
    pub bytes_scanned: u64,
    /// Ordered by partition index.
    pub failures: Vec<PartitionFailure>,
}

/// Fan-in collector for partial results.
///
/// Completion is signalled by the channel disconnecting: `collect` returns
/// once every [`Sender`] handed out by [`Aggregator::new`] (and its clones)
/// has been dropped.
pub struct Aggregator {
    expected: usize,
    rx: Receiver<PartialResult>,
}

impl Aggregator {
    /// Create a collector for `expected` results and the sender workers use
    /// to report them.
    pub fn new(expected: usize) -> (Self, Sender<PartialResult>) {
        let (tx, rx) = channel::unbounded();
        (Self { expected, rx }, tx)
    }

    #[inline]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Block until all senders are gone and return the accumulated sum.
    /// Results may arrive in any order.
    pub fn collect(self, observer: &dyn JobObserver) -> AggregateResult {
        let mut agg = AggregateResult::default();
        for result in self.rx.iter() {
            agg.total += result.count;
            agg.bytes_scanned += result.bytes_scanned;
            agg.received += 1;
            observer.result_received(&result, agg.total);
            if let Some(error) = result.error {
                agg.failures.push(PartitionFailure {
                    index: result.index,
                    error,
                });
            }
        }
        agg.failures.sort_by_key(|f| f.index);
        observer.aggregated(&agg);
        agg
    }
}
