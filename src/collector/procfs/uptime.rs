//! Uptime of the proxy process, derived from `/proc/[pid]/stat` and
//! `/proc/uptime`.

use std::path::PathBuf;

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{parse_pid, parse_stat_starttime, parse_uptime};
use crate::collector::traits::FileSystem;

/// USER_HZ used when the kernel cannot be asked.
const DEFAULT_CLK_TCK: u64 = 100;

/// Returns the kernel clock tick rate (`sysconf(_SC_CLK_TCK)`).
#[cfg(unix)]
pub fn clock_ticks_per_second() -> u64 {
    // SAFETY: sysconf takes no pointers and has no preconditions.
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 {
        ticks as u64
    } else {
        DEFAULT_CLK_TCK
    }
}

#[cfg(not(unix))]
pub fn clock_ticks_per_second() -> u64 {
    DEFAULT_CLK_TCK
}

/// Seconds a process has been running.
///
/// `start_ticks` is the process start time in clock ticks after boot.
/// Inconsistent inputs (process started "after" the current uptime) clamp
/// to 0. The result is truncated to whole seconds.
pub fn elapsed_secs(system_uptime: f64, start_ticks: u64, ticks_per_second: u64) -> u64 {
    if ticks_per_second == 0 {
        return 0;
    }
    let started_at = start_ticks as f64 / ticks_per_second as f64;
    let elapsed = system_uptime - started_at;
    if elapsed > 0.0 { elapsed as u64 } else { 0 }
}

/// Estimates how long the proxy process has been running.
pub struct UptimeEstimator<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
    pid_file: PathBuf,
    clk_tck: u64,
}

impl<F: FileSystem> UptimeEstimator<F> {
    /// Creates a new estimator.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    /// * `pid_file` - PID file written by the proxy
    /// * `clk_tck` - Clock ticks per second
    pub fn new(
        fs: F,
        proc_path: impl Into<PathBuf>,
        pid_file: impl Into<PathBuf>,
        clk_tck: u64,
    ) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
            pid_file: pid_file.into(),
            clk_tck,
        }
    }

    /// Uptime in seconds, or 0 if any input is missing or malformed.
    pub fn uptime_secs(&self) -> u64 {
        match self.try_uptime_secs() {
            Ok(secs) => secs,
            Err(e) => {
                debug!("proxy uptime unavailable: {}", e);
                0
            }
        }
    }

    fn try_uptime_secs(&self) -> Result<u64, CollectError> {
        let pid = parse_pid(&self.fs.read_to_string(&self.pid_file)?)?;

        let stat_path = self.proc_path.join(pid.to_string()).join("stat");
        let start_ticks = parse_stat_starttime(&self.fs.read_to_string(&stat_path)?)?;

        let uptime_path = self.proc_path.join("uptime");
        let system_uptime = parse_uptime(&self.fs.read_to_string(&uptime_path)?)?;

        Ok(elapsed_secs(system_uptime, start_ticks, self.clk_tck))
    }
}
