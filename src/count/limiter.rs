use rayon::{ThreadPool, ThreadPoolBuilder};

use super::error::CountError;

/// Admission gate that runs at most `capacity` tasks at once.
///
/// Backed by a dedicated rayon pool with exactly `capacity` threads, so the
/// global pool (and its core-count sizing) is left untouched. A task holds
/// its slot for as long as it runs on a pool thread; queued tasks wait in
/// the pool until a thread frees up.
pub struct ConcurrencyLimiter {
    pool: ThreadPool,
    capacity: usize,
}

impl ConcurrencyLimiter {
    pub fn new(capacity: usize) -> Result<Self, CountError> {
        let capacity = capacity.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(capacity)
            .thread_name(|i| format!("flinecount-worker-{}", i))
            .build()?;
        Ok(Self { pool, capacity })
    }

    /// Limiter for `tasks` tasks admitted at most `max_concurrent` at a time.
    /// Never spawns more threads than there are tasks to run.
    pub fn sized_for(max_concurrent: usize, tasks: usize) -> Result<Self, CountError> {
        Self::new(max_concurrent.min(tasks))
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run `f` once per item, at most `capacity` at a time, and return when
    /// every task has finished. Completion order is unspecified.
    pub fn run_all<T, F>(&self, items: Vec<T>, f: F)
    where
        T: Send,
        F: Fn(T) + Sync,
    {
        let f = &f;
        self.pool.scope(|s| {
            for item in items {
                s.spawn(move |_| f(item));
            }
        });
    }
}
