//! # Data Directory Locking
//!
//! One process at a time may own a ledger data directory. The file store
//! keeps its key space in memory and rewrites the file on every put, so a
//! second writer would silently overwrite the first one's records.
//!
//! Uses `fs2` (flock on Unix, LockFile on Windows). The lock is tied to the
//! open file handle and released on drop, or by the OS if the process dies.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use medtrace_ledger::StoreError;
use tracing::debug;

/// Exclusive lock on a data directory, held until dropped.
#[derive(Debug)]
pub struct DataDirLock {
    file: File,
    path: PathBuf,
}

impl DataDirLock {
    /// Lock file name inside the data directory.
    pub const LOCK_FILE: &'static str = "LOCK";

    /// Take the lock on `data_dir`, creating the directory if needed.
    ///
    /// Fails with `StoreError::Io` naming the holder's pid when another
    /// handle already owns the directory.
    pub fn acquire(data_dir: &Path) -> Result<Self, StoreError> {
        let io = |what: &str, e: std::io::Error| {
            StoreError::io(format!("{} {}: {}", what, data_dir.display(), e))
        };

        std::fs::create_dir_all(data_dir).map_err(|e| io("failed to create", e))?;
        let path = data_dir.join(Self::LOCK_FILE);

        // No truncate before the lock is ours: the holder's pid must survive.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| io("failed to open lock file in", e))?;

        if file.try_lock_exclusive().is_err() {
            return Err(match read_pid(&path) {
                Some(pid) => StoreError::io(format!(
                    "ledger in use by process {} ({})",
                    pid,
                    path.display()
                )),
                None => StoreError::io(format!("ledger in use ({})", path.display())),
            });
        }

        let pid = std::process::id();
        file.set_len(0)
            .and_then(|_| writeln!(file, "{}", pid))
            .and_then(|_| file.sync_all())
            .map_err(|e| io("failed to record pid in", e))?;

        debug!("[medtrace] Locked {} for process {}", path.display(), pid);
        Ok(Self { file, path })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        debug!("[medtrace] Released {}", self.path.display());
    }
}

fn read_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_refused_with_pid() {
        let dir = tempfile::tempdir().unwrap();
        let _held = DataDirLock::acquire(dir.path()).unwrap();

        match DataDirLock::acquire(dir.path()) {
            Err(StoreError::Io { message }) => {
                assert!(message.contains(&std::process::id().to_string()), "{message}");
            }
            other => panic!("expected busy lock, got {other:?}"),
        }
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let first = DataDirLock::acquire(dir.path()).unwrap();
        assert!(first.path().ends_with(DataDirLock::LOCK_FILE));
        drop(first);
        assert!(DataDirLock::acquire(dir.path()).is_ok());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let _lock = DataDirLock::acquire(&nested).unwrap();
        assert!(nested.join(DataDirLock::LOCK_FILE).exists());
    }
}
