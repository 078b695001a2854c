/// One worker's share of the file, in units of whole buffer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub index: usize,
    pub byte_offset: u64,
    pub read_count: u64,
}

impl Partition {
    /// Upper bound on the bytes this partition covers. The last non-empty
    /// partition may cover less if the file ends mid-buffer.
    #[inline]
    pub fn byte_len(&self, buffer_size: usize) -> u64 {
        self.read_count * buffer_size as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read_count == 0
    }
}

/// Number of `buffer_size` reads needed to cover `file_size` bytes.
#[inline]
pub fn read_count_total(file_size: u64, buffer_size: usize) -> u64 {
    debug_assert!(buffer_size > 0);
    file_size.div_ceil(buffer_size as u64)
}

/// Split a file into `partition_count` contiguous, ordered partitions.
///
/// Partition `i` gets `floor((total + i) / partition_count)` reads, which
/// sums to exactly `total` for any `partition_count >= 1`. The remainder
/// lands on the highest indices; when there are more partitions than reads,
/// the lowest indices get zero reads.
pub fn plan_partitions(file_size: u64, buffer_size: usize, partition_count: usize) -> Vec<Partition> {
    debug_assert!(partition_count > 0);
    let total = read_count_total(file_size, buffer_size);
    let n = partition_count as u64;

    let mut partitions = Vec::with_capacity(partition_count);
    let mut byte_offset = 0u64;
    for index in 0..partition_count {
        let read_count = (total + index as u64) / n;
        partitions.push(Partition {
            index,
            byte_offset,
            read_count,
        });
        byte_offset += read_count * buffer_size as u64;
    }
    partitions
}
