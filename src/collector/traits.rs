//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait lets the readers work against the real `/proc` and
//! `/sys/fs/cgroup` trees on Linux, or against `MockFs` in tests.

use std::io;
use std::path::Path;

/// Read-only view of the files the collector consumes.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_real_fs_read_to_string() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "536870912").unwrap();

        let fs = RealFs::new();
        let content = fs.read_to_string(file.path()).unwrap();
        assert_eq!(content, "536870912\n");
    }

    #[test]
    fn test_real_fs_exists() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFs::new();
        assert!(fs.exists(dir.path()));
        assert!(!fs.exists(&dir.path().join("memory.current")));
    }

    #[test]
    fn test_real_fs_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFs::new();
        let err = fs
            .read_to_string(&dir.path().join("squid.pid"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
