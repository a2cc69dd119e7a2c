//! Collection settings.
//!
//! The engine has no configuration file. Everything it touches (ports, paths,
//! timeouts) is a fixed constant gathered here so that tests and the CLI can
//! point individual readers somewhere else.

use std::path::PathBuf;
use std::time::Duration;

/// Listening port of the plain HTTP proxy endpoint.
pub const HTTP_PORT: u16 = 3128;
/// Listening port of the TLS proxy endpoint.
pub const HTTPS_PORT: u16 = 3129;
/// Manager page queried for operational counters.
pub const MANAGER_INFO_PATH: &str = "/squid-internal-mgr/info";
/// PID file written by the proxy on startup.
pub const PID_FILE: &str = "/var/run/squid.pid";
/// Cgroup v2 memory usage counter.
pub const CGROUP_V2_MEMORY: &str = "/sys/fs/cgroup/memory.current";
/// Cgroup v1 memory usage counter.
pub const CGROUP_V1_MEMORY: &str = "/sys/fs/cgroup/memory/memory.usage_in_bytes";

/// All the knobs of one collection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Base path of the proc filesystem (usually "/proc").
    pub proc_path: PathBuf,
    /// Connection tables to scan, relative to `proc_path`.
    pub tcp_sources: Vec<PathBuf>,
    pub http_port: u16,
    pub https_port: u16,
    pub pid_file: PathBuf,
    /// Memory counters, tried in order. The first one that exists wins.
    pub cgroup_memory_paths: Vec<PathBuf>,
    /// Host the manager request is sent to. Always local in practice.
    pub manager_host: String,
    pub manager_path: String,
    /// Timeout for the cleartext manager attempt.
    pub plain_timeout: Duration,
    /// Timeout for the TLS fallback attempt.
    pub tls_timeout: Duration,
    /// Clock ticks per second. `None` asks the kernel via `sysconf`.
    pub clock_ticks: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from("/proc"),
            tcp_sources: vec![PathBuf::from("net/tcp"), PathBuf::from("net/tcp6")],
            http_port: HTTP_PORT,
            https_port: HTTPS_PORT,
            pid_file: PathBuf::from(PID_FILE),
            cgroup_memory_paths: vec![
                PathBuf::from(CGROUP_V2_MEMORY),
                PathBuf::from(CGROUP_V1_MEMORY),
            ],
            manager_host: "127.0.0.1".to_string(),
            manager_path: MANAGER_INFO_PATH.to_string(),
            plain_timeout: Duration::from_millis(500),
            tls_timeout: Duration::from_secs(1),
            clock_ticks: None,
        }
    }
}

impl MonitorConfig {
    /// Replaces both cgroup memory counters with the files found under `dir`.
    ///
    /// `dir` is treated as a cgroup mount point: the v2 counter is looked up
    /// directly inside it and the v1 counter under its `memory/` controller.
    pub fn with_cgroup_root(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.cgroup_memory_paths = vec![
            dir.join("memory.current"),
            dir.join("memory").join("memory.usage_in_bytes"),
        ];
        self
    }

    /// Absolute paths of the connection tables.
    pub fn tcp_source_paths(&self) -> Vec<PathBuf> {
        self.tcp_sources
            .iter()
            .map(|s| self.proc_path.join(s))
            .collect()
    }
}
