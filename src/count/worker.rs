use std::io::{self, Read};
use std::path::Path;

use memchr::memchr_iter;

use super::config::JobSpec;
use super::partition::Partition;
use crate::common::io::{open_at, open_noatime, read_full};

/// Outcome of one worker, produced exactly once per partition.
#[derive(Debug)]
pub struct PartialResult {
    pub index: usize,
    pub count: u64,
    pub bytes_scanned: u64,
    /// Set when the worker stopped early on an I/O error. `count` still
    /// holds everything counted before the failure.
    pub error: Option<io::Error>,
}

impl PartialResult {
    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Count occurrences of `delimiter` using SIMD-accelerated memchr.
#[inline]
pub fn count_delimiters(data: &[u8], delimiter: u8) -> u64 {
    memchr_iter(delimiter, data).count() as u64
}

/// Count delimiters in one partition through a private file handle.
///
/// Never fails: an open, seek, or read error ends the scan and is carried
/// in the returned result next to the count accumulated so far.
pub fn count_partition(path: &Path, partition: &Partition, job: &JobSpec) -> PartialResult {
    let mut result = PartialResult {
        index: partition.index,
        count: 0,
        bytes_scanned: 0,
        error: None,
    };
    if partition.is_empty() {
        return result;
    }

    let mut file = match open_at(
        path,
        partition.byte_offset,
        partition.byte_len(job.buffer_size),
    ) {
        Ok(f) => f,
        Err(e) => {
            result.error = Some(e);
            return result;
        }
    };

    let mut buf = vec![0u8; scan_buffer_len(partition, job)];
    result = count_fills(&mut file, partition.read_count, &mut buf, job.delimiter);
    result.index = partition.index;
    result
}

/// Scan buffer size for `partition`: one buffer-read unit, but never more
/// than what is left of the file past the partition's offset.
pub fn scan_buffer_len(partition: &Partition, job: &JobSpec) -> usize {
    let remaining = job.file_size.saturating_sub(partition.byte_offset);
    (job.buffer_size as u64).min(remaining).max(1) as usize
}

/// Perform up to `read_count` fills of `buf` from `reader`, counting
/// `delimiter` in the bytes each fill returned.
///
/// Stops at EOF or on the first error; the error is kept in the result
/// next to the count accumulated before it. The returned index is 0.
pub fn count_fills(
    reader: &mut impl Read,
    read_count: u64,
    buf: &mut [u8],
    delimiter: u8,
) -> PartialResult {
    let mut result = PartialResult {
        index: 0,
        count: 0,
        bytes_scanned: 0,
        error: None,
    };
    for _ in 0..read_count {
        match read_full(&mut *reader, buf) {
            Ok(0) => break,
            Ok(n) => {
                // Only the bytes from this fill; the tail may hold stale data.
                result.count += count_delimiters(&buf[..n], delimiter);
                result.bytes_scanned += n as u64;
                if n < buf.len() {
                    break;
                }
            }
            Err(e) => {
                result.error = Some(e);
                break;
            }
        }
    }
    result
}

/// Single-pass sequential scan of the whole file. Baseline for the
/// partitioned count.
pub fn count_serial(path: &Path, buffer_size: usize, delimiter: u8) -> io::Result<u64> {
    let mut file = open_noatime(path)?;
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut count = 0u64;
    loop {
        let n = read_full(&mut file, &mut buf)?;
        if n == 0 {
            break;
        }
        count += count_delimiters(&buf[..n], delimiter);
    }
    Ok(count)
}
