//! # MedTrace Node
//!
//! Host process for the traceability ledger.
//!
//! ## Modules
//!
//! - `config` - `NodeConfig` from `MEDTRACE_*` environment variables
//! - `logging` - `tracing-subscriber` setup (plain or JSON)
//! - `storage` - persistent `LedgerStore` adapters (file, RocksDB)
//! - `runtime` - wires a store, clock, provenance and publisher into the service
//! - `cli` - command-line front end
//! - `demo` - end-to-end walk-through against an in-memory ledger

pub mod cli;
pub mod config;
pub mod demo;
pub mod logging;
pub mod runtime;
pub mod storage;

pub use config::{ConfigError, LoggingConfig, NodeConfig, StorageConfig, StoreKind};
pub use runtime::{open_store, Node, NodeService};
