//! Main collector that combines all readers into a `Snapshot`.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::collector::cgroup::MemoryReader;
use crate::collector::procfs::{ConnectionTableReader, UptimeEstimator, clock_ticks_per_second};
use crate::collector::squid::SquidClient;
use crate::collector::traits::FileSystem;
use crate::config::MonitorConfig;
use crate::model::Snapshot;

/// Timing information for each collector phase.
///
/// Used for debugging; never part of the snapshot itself.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    /// Total snapshot collection time.
    pub total: Duration,
    /// Time to scan the connection tables.
    pub connections: Duration,
    /// Time to estimate proxy uptime.
    pub uptime: Duration,
    /// Time to read the cgroup memory counter.
    pub memory: Duration,
    /// Time spent talking to the proxy manager.
    pub squid: Duration,
}

/// Gathers one snapshot per call.
///
/// Holds only configuration, so `collect_snapshot` takes `&self` and
/// concurrent callers never observe each other.
pub struct Collector<F: FileSystem + Clone> {
    connections: ConnectionTableReader<F>,
    uptime: UptimeEstimator<F>,
    memory: MemoryReader<F>,
    squid: SquidClient,
}

impl<F: FileSystem + Clone> Collector<F> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `config` - Paths, ports and timeouts
    pub fn new(fs: F, config: &MonitorConfig) -> Self {
        let clk_tck = config.clock_ticks.unwrap_or_else(clock_ticks_per_second);

        Self {
            connections: ConnectionTableReader::new(
                fs.clone(),
                config.tcp_source_paths(),
                config.http_port,
                config.https_port,
            ),
            uptime: UptimeEstimator::new(
                fs.clone(),
                config.proc_path.clone(),
                config.pid_file.clone(),
                clk_tck,
            ),
            memory: MemoryReader::new(fs, config.cgroup_memory_paths.clone()),
            squid: SquidClient::from_config(config),
        }
    }

    /// Replaces the manager client, e.g. to point it at a test listener.
    pub fn with_squid_client(mut self, client: SquidClient) -> Self {
        self.squid = client;
        self
    }

    /// Collects a snapshot. Never fails: unavailable sources contribute
    /// their zero defaults.
    pub fn collect_snapshot(&self) -> Snapshot {
        self.collect_snapshot_timed().0
    }

    /// Collects a snapshot together with per-phase timings.
    pub fn collect_snapshot_timed(&self) -> (Snapshot, CollectorTiming) {
        let mut timing = CollectorTiming::default();
        let start = Instant::now();

        let t = Instant::now();
        let connections = self.connections.collect();
        timing.connections = t.elapsed();

        let t = Instant::now();
        let uptime = self.uptime.uptime_secs();
        timing.uptime = t.elapsed();

        let t = Instant::now();
        let memory_mb = self.memory.memory_mb();
        timing.memory = t.elapsed();

        let t = Instant::now();
        let squid = self.squid.status();
        timing.squid = t.elapsed();

        timing.total = start.elapsed();
        debug!(
            "snapshot collected in {:?} (connections {:?}, uptime {:?}, memory {:?}, squid {:?})",
            timing.total, timing.connections, timing.uptime, timing.memory, timing.squid
        );

        let snapshot = Snapshot::new(&connections, uptime, memory_mb, squid);
        (snapshot, timing)
    }
}
