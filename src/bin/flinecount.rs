use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use linecount_rs::common::{TOOL_NAME, diagnostic, io_error_msg, reset_sigpipe};
use linecount_rs::count::{
    self, CountConfig, CountError, DEFAULT_BUFFER_SIZE, DEFAULT_MAX_THREADS, DEFAULT_PARTITIONS,
    ErrorPolicy,
};

#[derive(Parser)]
#[command(
    name = "flinecount",
    version,
    about = "Count newlines in a file by scanning partitions of it in parallel"
)]
struct Cli {
    /// Target file
    #[arg(short = 'f', long = "file", value_name = "TARGETFILE")]
    file: PathBuf,

    /// Number of partitions the file is split into
    #[arg(short = 's', long = "split", value_name = "N", default_value_t = DEFAULT_PARTITIONS, value_parser = parse_positive)]
    split: usize,

    /// Maximum number of partitions scanned at once
    #[arg(short = 't', long = "threads", value_name = "N", default_value_t = DEFAULT_MAX_THREADS, value_parser = parse_positive)]
    threads: usize,

    /// Size of each read in bytes
    #[arg(short = 'b', long = "buffer-size", value_name = "N", default_value_t = DEFAULT_BUFFER_SIZE, value_parser = parse_positive)]
    buffer_size: usize,

    /// Count NUL bytes instead of newlines
    #[arg(short = 'z', long = "zero")]
    zero: bool,

    /// Fail if any partition hits a read error instead of printing a partial count
    #[arg(long = "fail-fast")]
    fail_fast: bool,

    /// Increase log verbosity (-v: job summary, -vv: per-partition detail)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn parse_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Log to stderr. Without -v, RUST_LOG is honored and defaults to warnings only.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

impl Cli {
    fn config(&self) -> CountConfig {
        let policy = if self.fail_fast {
            ErrorPolicy::FailFast
        } else {
            ErrorPolicy::BestEffort
        };
        CountConfig::new(self.split, self.threads, self.buffer_size)
            .with_delimiter(if self.zero { 0 } else { b'\n' })
            .with_error_policy(policy)
    }
}

/// Turn a job error into the single diagnostic line printed on stderr.
fn describe(path: &Path, e: CountError) -> anyhow::Error {
    let subject = path.display().to_string();
    match e {
        CountError::Open { source, .. } => anyhow!(diagnostic(&subject, &source)),
        CountError::NotRegularFile { .. } => {
            anyhow!("{}: {}: not a regular file", TOOL_NAME, subject)
        }
        other => anyhow::Error::new(other).context(format!("{}: {}", TOOL_NAME, subject)),
    }
}

fn run(cli: &Cli) -> anyhow::Result<u64> {
    let report = count::count(&cli.file, &cli.config()).map_err(|e| describe(&cli.file, e))?;
    Ok(report.total)
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let total = match run(&cli) {
        Ok(total) => total,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = writeln!(out, "{}", total).and_then(|_| out.flush()) {
        eprintln!("{}: write error: {}", TOOL_NAME, io_error_msg(&e));
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::process::Command;

    fn cmd() -> Command {
        let mut path = std::env::current_exe().unwrap();
        path.pop();
        path.pop();
        path.push("flinecount");
        Command::new(path)
    }

    #[test]
    fn test_flinecount_basic() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("abc.txt");
        std::fs::write(&file, "a\nb\nc\n").unwrap();
        let output = cmd()
            .args(["-f", file.to_str().unwrap(), "-s", "2", "-b", "4"])
            .output()
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "3\n");
    }

    #[test]
    fn test_flinecount_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("test.txt");
        std::fs::write(&file, "one two\nthree\n").unwrap();
        let output = cmd().arg("-f").arg(&file).output().unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "2\n");
    }

    #[test]
    fn test_flinecount_many_partitions_one_thread() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("many.txt");
        std::fs::write(&file, "x\n".repeat(1000)).unwrap();
        let output = cmd()
            .arg("-f")
            .arg(&file)
            .args(["-s", "17", "-t", "1", "-b", "7"])
            .output()
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "1000\n");
    }

    #[test]
    fn test_flinecount_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.txt");
        std::fs::write(&file, "").unwrap();
        let output = cmd().arg("-f").arg(&file).args(["-s", "4"]).output().unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "0\n");
    }

    #[test]
    fn test_flinecount_zero_terminated() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nul.bin");
        std::fs::write(&file, b"a\0b\0\n").unwrap();
        let output = cmd().arg("-z").arg("-f").arg(&file).output().unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "2\n");
    }

    #[test]
    fn test_flinecount_nonexistent_file() {
        let output = cmd()
            .args(["-f", "/nonexistent_xyz_flinecount"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("flinecount: /nonexistent_xyz_flinecount: No such file or directory"));
    }

    #[test]
    fn test_flinecount_missing_file_flag() {
        let output = cmd().output().unwrap();
        assert!(!output.status.success());
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_flinecount_rejects_zero_split() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("z.txt");
        std::fs::write(&file, "\n").unwrap();
        let output = cmd().arg("-f").arg(&file).args(["-s", "0"]).output().unwrap();
        assert!(!output.status.success());
    }

    #[test]
    fn test_flinecount_verbose_logs_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("v.txt");
        std::fs::write(&file, "a\nb\n").unwrap();
        let output = cmd().arg("-vv").arg("-f").arg(&file).output().unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "2\n");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("count finished"));
        assert!(stderr.contains("worker start"));
    }
}
