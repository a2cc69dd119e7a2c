//! squidmon - one-shot stats snapshot of a Squid proxy host.
//!
//! Collects connection counts, proxy uptime, cgroup memory usage and manager
//! counters, then prints them as JSON on stdout. Logs go to stderr.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use squidmon::collector::{Collector, RealFs};
use squidmon::config::{self, MonitorConfig};
use squidmon::model::Snapshot;

/// Point-in-time stats for a Squid proxy host.
#[derive(Parser)]
#[command(name = "squidmon", about = "Squid proxy host stats snapshot", version)]
struct Args {
    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: PathBuf,

    /// PID file written by the proxy.
    #[arg(long, default_value = config::PID_FILE)]
    pid_file: PathBuf,

    /// Path to the cgroup mount holding the memory counters.
    #[arg(long, value_name = "PATH")]
    cgroup_path: Option<PathBuf>,

    /// Host of the proxy manager interface.
    #[arg(long, default_value = "127.0.0.1")]
    manager_host: String,

    /// Plain HTTP listening port (also the first manager attempt).
    #[arg(long, default_value_t = config::HTTP_PORT)]
    http_port: u16,

    /// TLS listening port (also the manager fallback attempt).
    #[arg(long, default_value_t = config::HTTPS_PORT)]
    https_port: u16,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Print a one-line human summary instead of JSON.
    #[arg(long, conflicts_with = "pretty")]
    summary: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn monitor_config(&self) -> MonitorConfig {
        let mut config = MonitorConfig {
            proc_path: self.proc_path.clone(),
            pid_file: self.pid_file.clone(),
            manager_host: self.manager_host.clone(),
            http_port: self.http_port,
            https_port: self.https_port,
            ..MonitorConfig::default()
        };
        if let Some(path) = &self.cgroup_path {
            config = config.with_cgroup_root(path);
        }
        config
    }
}

/// Initializes the tracing subscriber on stderr so stdout stays pure JSON.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    // RUST_LOG, when set, takes precedence over -v/-q.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("squidmon={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Describes a snapshot in one line.
fn describe_snapshot(snapshot: &Snapshot) -> String {
    let squid = snapshot.squid();
    format!(
        "{} connections ({} http from {} clients, {} https from {} clients), uptime {}s, memory {:.1} MB, {} requests, {} hits, {} misses, byte hit ratio {:.1}%",
        snapshot.total_connections(),
        snapshot.http_connections(),
        snapshot.http_clients().len(),
        snapshot.https_connections(),
        snapshot.https_clients().len(),
        snapshot.uptime(),
        snapshot.memory_mb(),
        squid.requests_total,
        squid.cache_hits,
        squid.cache_misses,
        squid.byte_hit_ratio,
    )
}

fn render(snapshot: &Snapshot, args: &Args) -> Result<String, serde_json::Error> {
    if args.summary {
        Ok(describe_snapshot(snapshot))
    } else if args.pretty {
        serde_json::to_string_pretty(snapshot)
    } else {
        serde_json::to_string(snapshot)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = args.monitor_config();
    info!(
        "squidmon {}: proc={}, ports={}/{}, manager={}",
        env!("CARGO_PKG_VERSION"),
        config.proc_path.display(),
        config.http_port,
        config.https_port,
        config.manager_host
    );

    let collector = Collector::new(RealFs::new(), &config);
    let (snapshot, timing) = collector.collect_snapshot_timed();
    info!("collected in {:?}: {}", timing.total, describe_snapshot(&snapshot));

    let output = match render(&snapshot, &args) {
        Ok(output) => output,
        Err(e) => {
            error!("failed to serialize snapshot: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", output) {
        error!("failed to write snapshot: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
