use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

#[cfg(target_os = "linux")]
use std::sync::atomic::{AtomicBool, Ordering};

/// Track whether O_NOATIME is supported to avoid repeated failed open() attempts.
/// Every worker opens its own handle, so after the first EPERM we never try
/// O_NOATIME again (saves one syscall per partition).
#[cfg(target_os = "linux")]
static NOATIME_SUPPORTED: AtomicBool = AtomicBool::new(true);

/// Open a file read-only with O_NOATIME on Linux to avoid atime inode writes.
/// Caches whether O_NOATIME works to avoid double-open on every partition.
#[cfg(target_os = "linux")]
pub fn open_noatime(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    if NOATIME_SUPPORTED.load(Ordering::Relaxed) {
        match std::fs::OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NOATIME)
            .open(path)
        {
            Ok(f) => return Ok(f),
            Err(ref e) if e.raw_os_error() == Some(libc::EPERM) => {
                // O_NOATIME requires file ownership or CAP_FOWNER
                NOATIME_SUPPORTED.store(false, Ordering::Relaxed);
            }
            Err(e) => return Err(e),
        }
    }
    File::open(path)
}

#[cfg(not(target_os = "linux"))]
pub fn open_noatime(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Open a private read handle positioned at `offset`.
///
/// Each caller gets its own cursor; handles are never shared between
/// partitions. `len` is the number of bytes the caller intends to read from
/// `offset` and is only used as a readahead hint.
pub fn open_at(path: &Path, offset: u64, len: u64) -> io::Result<File> {
    let mut file = open_noatime(path)?;
    if offset > 0 {
        file.seek(SeekFrom::Start(offset))?;
    }
    advise_sequential(&file, offset, len);
    Ok(file)
}

/// Hint the kernel that `[offset, offset + len)` will be read sequentially.
#[cfg(target_os = "linux")]
fn advise_sequential(file: &File, offset: u64, len: u64) {
    use std::os::unix::io::AsRawFd;
    if len == 0 {
        return;
    }
    unsafe {
        libc::posix_fadvise(
            file.as_raw_fd(),
            offset as libc::off_t,
            len as libc::off_t,
            libc::POSIX_FADV_SEQUENTIAL,
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn advise_sequential(_file: &File, _offset: u64, _len: u64) {}

/// Fill `buf` from `reader`, retrying on partial reads.
/// Returns fewer than `buf.len()` bytes only at EOF, so one fill always
/// covers exactly one buffer-read unit of the file.
/// Fast path: regular file reads usually return the full buffer on the first call.
#[inline]
pub fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let n = loop {
        match reader.read(buf) {
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    };
    if n == buf.len() || n == 0 {
        return Ok(n);
    }
    // Slow path: partial read, keep going until full or EOF
    let mut total = n;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
