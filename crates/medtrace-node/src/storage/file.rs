//! File-backed ledger store.
//!
//! Keeps the whole key space in memory and rewrites one file after every put.
//! Suitable for the command line and light use; no native dependencies.
//! The containing directory is locked for the store's lifetime, so only one
//! process writes a given ledger file.
//!
//! ## File format
//!
//! ```text
//! "MTL1" ([key_len: u32 LE][key][value_len: u32 LE][value])*
//! ```

use async_trait::async_trait;
use medtrace_ledger::{LedgerStore, StoreError};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::lock::DataDirLock;

const MAGIC: &[u8; 4] = b"MTL1";

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// Ledger store persisted to a single file.
pub struct FileLedgerStore {
    data: RwLock<Entries>,
    path: PathBuf,
    sync_writes: bool,
    /// Serializes snapshot-and-write so the file always holds the latest state.
    write_lock: Mutex<()>,
    _dir_lock: DataDirLock,
}

impl FileLedgerStore {
    /// Open the store at `path`, loading existing contents if the file exists.
    ///
    /// Fails with `StoreError::Io` while another handle has the directory open.
    pub fn open(path: impl AsRef<Path>, sync_writes: bool) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let dir_lock = DataDirLock::acquire(dir)?;

        let data = match std::fs::read(&path) {
            Ok(bytes) => {
                let data = decode_entries(&bytes, &path)?;
                info!(
                    "[medtrace] Loaded {} keys from {}",
                    data.len(),
                    path.display()
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[medtrace] No existing ledger file at {}", path.display());
                Entries::new()
            }
            Err(e) => {
                return Err(StoreError::io(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            data: RwLock::new(data),
            path,
            sync_writes,
            write_lock: Mutex::new(()),
            _dir_lock: dir_lock,
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LedgerStore for FileLedgerStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        let _write = self.write_lock.lock().await;

        let mut next = self.data.read().clone();
        next.insert(key.to_vec(), value);
        let bytes = encode_entries(&next);

        let path = self.path.clone();
        let sync = self.sync_writes;
        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes, sync))
            .await
            .map_err(|e| StoreError::io(format!("write task failed: {}", e)))??;

        *self.data.write() = next;
        debug!("[medtrace] Persisted {}", String::from_utf8_lossy(key));
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let data = self.data.read();
        Ok(data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

fn encode_entries(entries: &Entries) -> Vec<u8> {
    let size: usize = entries.iter().map(|(k, v)| 8 + k.len() + v.len()).sum();
    let mut bytes = Vec::with_capacity(MAGIC.len() + size);
    bytes.extend_from_slice(MAGIC);
    for (key, value) in entries {
        bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
        bytes.extend_from_slice(key);
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value);
    }
    bytes
}

fn decode_entries(bytes: &[u8], path: &Path) -> Result<Entries, StoreError> {
    let corrupt =
        |what: &str| StoreError::corruption(format!("{}: {}", path.display(), what));

    if bytes.is_empty() {
        return Ok(Entries::new());
    }
    let mut rest = bytes
        .strip_prefix(MAGIC.as_slice())
        .ok_or_else(|| corrupt("missing ledger file header"))?;

    let mut entries = Entries::new();
    while !rest.is_empty() {
        let (key, after_key) = take_chunk(rest).ok_or_else(|| corrupt("truncated key"))?;
        let (value, after_value) =
            take_chunk(after_key).ok_or_else(|| corrupt("truncated value"))?;
        entries.insert(key.to_vec(), value.to_vec());
        rest = after_value;
    }
    Ok(entries)
}

/// Split one `[len: u32 LE][bytes]` chunk off the front.
fn take_chunk(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let len_bytes: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    let body = bytes.get(4..)?;
    if body.len() < len {
        return None;
    }
    Some(body.split_at(len))
}

fn write_atomically(path: &Path, bytes: &[u8], sync: bool) -> Result<(), StoreError> {
    let io = |e: std::io::Error| StoreError::io(format!("{}: {}", path.display(), e));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = std::fs::File::create(&temp_path).map_err(io)?;
    file.write_all(bytes).map_err(io)?;
    if sync {
        file.sync_all().map_err(io)?;
    }
    std::fs::rename(&temp_path, path).map_err(io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.bin");

        let store = FileLedgerStore::open(&path, false).unwrap();
        store.put(b"med_a", b"{\"a\":1}".to_vec()).await.unwrap();
        store.put(b"events_a", b"[]".to_vec()).await.unwrap();
        store.put(b"med_a", b"{\"a\":2}".to_vec()).await.unwrap();
        drop(store);

        let reopened = FileLedgerStore::open(&path, false).unwrap();
        assert_eq!(
            reopened.get(b"med_a").await.unwrap(),
            Some(b"{\"a\":2}".to_vec())
        );
        assert_eq!(reopened.scan_prefix(b"med_").await.unwrap().len(), 1);
        assert_eq!(reopened.scan_prefix(b"events_").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLedgerStore::open(dir.path().join("absent.bin"), true).unwrap();
        assert!(store.scan_prefix(b"").await.unwrap().is_empty());
    }

    #[test]
    fn test_truncated_file_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");

        let mut entries = Entries::new();
        entries.insert(b"med_a".to_vec(), b"value".to_vec());
        let bytes = encode_entries(&entries);
        std::fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

        assert!(matches!(
            FileLedgerStore::open(&path, false),
            Err(StoreError::Corruption { .. })
        ));
    }

    #[tokio::test]
    async fn test_second_open_of_same_ledger_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");

        let first = FileLedgerStore::open(&path, false).unwrap();
        assert!(matches!(
            FileLedgerStore::open(&path, false),
            Err(StoreError::Io { .. })
        ));

        first.put(b"med_a", b"1".to_vec()).await.unwrap();
        drop(first);

        let second = FileLedgerStore::open(&path, false).unwrap();
        assert_eq!(second.get(b"med_a").await.unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn test_foreign_file_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");
        std::fs::write(&path, b"hello world").unwrap();
        assert!(FileLedgerStore::open(&path, false).is_err());
    }
}
