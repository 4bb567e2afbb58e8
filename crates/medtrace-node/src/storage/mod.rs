//! # Persistent Ledger Stores
//!
//! `LedgerStore` adapters that survive process restarts.
//!
//! - `file` - single length-prefixed binary file, no native dependencies
//! - `lock` - exclusive data directory lock held by the file store
//! - `rocksdb_store` - RocksDB with Snappy compression (feature `rocksdb`)

pub mod file;
pub mod lock;
#[cfg(feature = "rocksdb")]
pub mod rocksdb_store;

pub use file::FileLedgerStore;
pub use lock::DataDirLock;
#[cfg(feature = "rocksdb")]
pub use rocksdb_store::RocksDbLedgerStore;
