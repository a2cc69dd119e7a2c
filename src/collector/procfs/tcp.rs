//! Connection table reader for `/proc/net/tcp` and `/proc/net/tcp6`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::parse_tcp_table;
use crate::collector::traits::FileSystem;
use crate::model::{ConnectionStats, Protocol};

/// Counts client connections to the proxy listening ports.
pub struct ConnectionTableReader<F: FileSystem> {
    fs: F,
    sources: Vec<PathBuf>,
    http_port: u16,
    https_port: u16,
}

impl<F: FileSystem> ConnectionTableReader<F> {
    /// Creates a new reader.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `sources` - Connection tables to scan, in order
    /// * `http_port` / `https_port` - Listening ports of the two buckets
    pub fn new(fs: F, sources: Vec<PathBuf>, http_port: u16, https_port: u16) -> Self {
        Self {
            fs,
            sources,
            http_port,
            https_port,
        }
    }

    fn protocol_for(&self, port: u16) -> Option<Protocol> {
        if port == self.http_port {
            Some(Protocol::Http)
        } else if port == self.https_port {
            Some(Protocol::Https)
        } else {
            None
        }
    }

    /// Scans all sources. Sources that are missing or unreadable are skipped,
    /// so the result is zero-filled when nothing can be read.
    pub fn collect(&self) -> ConnectionStats {
        let mut stats = ConnectionStats::default();

        for source in &self.sources {
            if !self.fs.exists(source) {
                debug!("connection table {} not present", source.display());
                continue;
            }
            if let Err(e) = self.scan_source(source, &mut stats) {
                debug!("skipping connection table {}: {}", source.display(), e);
            }
        }

        stats
    }

    fn scan_source(
        &self,
        source: &Path,
        stats: &mut ConnectionStats,
    ) -> Result<(), CollectError> {
        let content = self.fs.read_to_string(source)?;
        let ports = [self.http_port, self.https_port];

        for entry in parse_tcp_table(&content, &ports) {
            if let Some(protocol) = self.protocol_for(entry.local_port) {
                stats.bucket_mut(protocol).record(entry.remote_addr);
            }
        }

        Ok(())
    }
}
