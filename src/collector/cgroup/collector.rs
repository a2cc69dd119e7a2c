//! Cgroup memory usage reader.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::traits::FileSystem;

use super::parser;

/// Reads current memory usage from the first cgroup counter that exists.
pub struct MemoryReader<F: FileSystem> {
    fs: F,
    candidates: Vec<PathBuf>,
}

impl<F: FileSystem> MemoryReader<F> {
    /// Creates a new MemoryReader.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation
    /// * `candidates` - Counter files in order of preference (v2, then v1)
    pub fn new(fs: F, candidates: Vec<PathBuf>) -> Self {
        Self { fs, candidates }
    }

    /// Memory usage in megabytes, one decimal. Returns 0.0 when no counter
    /// exists or the chosen one cannot be read.
    pub fn memory_mb(&self) -> f64 {
        let Some(path) = self.candidates.iter().find(|p| self.fs.exists(p)) else {
            debug!("no cgroup memory counter present");
            return 0.0;
        };

        match self.read_bytes(path) {
            Ok(bytes) => parser::bytes_to_mb(bytes),
            Err(e) => {
                debug!("cgroup memory counter {}: {}", path.display(), e);
                0.0
            }
        }
    }

    fn read_bytes(&self, path: &Path) -> Result<u64, CollectError> {
        let content = self.fs.read_to_string(path)?;
        parser::parse_memory_bytes(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::MockFs;

    const V2: &str = "/sys/fs/cgroup/memory.current";
    const V1: &str = "/sys/fs/cgroup/memory/memory.usage_in_bytes";

    fn reader(fs: MockFs) -> MemoryReader<MockFs> {
        MemoryReader::new(fs, vec![PathBuf::from(V2), PathBuf::from(V1)])
    }

    #[test]
    fn test_v2_counter() {
        assert_eq!(reader(MockFs::squid_host()).memory_mb(), 100.5);
    }

    #[test]
    fn test_v1_fallback() {
        let mut fs = MockFs::new();
        fs.add_file(V1, "268435456\n");
        assert_eq!(reader(fs).memory_mb(), 256.0);
    }

    #[test]
    fn test_v2_preferred_over_v1() {
        let mut fs = MockFs::new();
        fs.add_file(V2, "1048576\n");
        fs.add_file(V1, "268435456\n");
        assert_eq!(reader(fs).memory_mb(), 1.0);
    }

    #[test]
    fn test_broken_v2_does_not_fall_through() {
        let mut fs = MockFs::new();
        fs.add_file(V2, "garbage\n");
        fs.add_file(V1, "268435456\n");
        assert_eq!(reader(fs).memory_mb(), 0.0);
    }

    #[test]
    fn test_no_counters() {
        assert_eq!(reader(MockFs::empty_host()).memory_mb(), 0.0);
    }
}
