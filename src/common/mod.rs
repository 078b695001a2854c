pub mod io;

/// Name used as the prefix of every diagnostic line.
pub const TOOL_NAME: &str = "flinecount";

/// Reset SIGPIPE to default behavior (SIG_DFL).
/// Rust sets SIGPIPE to SIG_IGN by default, so `flinecount ... | head -0`
/// would otherwise surface as a write error instead of a quiet exit.
/// Must be called at the start of main().
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// Format an IO error message without the "(os error N)" suffix.
/// Produces "No such file or directory" where Rust's Display would
/// append " (os error 2)".
pub fn io_error_msg(e: &std::io::Error) -> String {
    if let Some(raw) = e.raw_os_error() {
        let os_err = std::io::Error::from_raw_os_error(raw);
        let msg = format!("{}", os_err);
        msg.replace(&format!(" (os error {})", raw), "")
    } else {
        format!("{}", e)
    }
}

/// Build a `flinecount: SUBJECT: message` diagnostic line.
pub fn diagnostic(subject: &str, e: &std::io::Error) -> String {
    format!("{}: {}: {}", TOOL_NAME, subject, io_error_msg(e))
}
