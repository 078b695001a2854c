/// Use mimalloc as the global allocator.
/// Every worker allocates its own scan buffer; mimalloc's thread-local
/// caching keeps those allocations off a shared lock.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod count;
