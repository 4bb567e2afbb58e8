//! # Node Configuration
//!
//! Configuration for the host process, read from environment variables.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `MEDTRACE_STORE` | `memory`, `file` or `rocksdb` | `file` |
//! | `MEDTRACE_DATA_DIR` | Directory for persistent stores | `./data` |
//! | `MEDTRACE_SYNC_WRITES` | fsync every write | `true` |
//! | `MEDTRACE_LOG_LEVEL` or `RUST_LOG` | Log filter | `info` |
//! | `MEDTRACE_JSON_LOGS` | JSON formatted logs | `false` |
//! | `MEDTRACE_RECALL_ISSUER` | Default recall issuer | `DIGEMID` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use medtrace_ledger::LedgerConfig;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("Invalid value '{value}' for {var}: expected {expected}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Rejected value
        value: String,
        /// What would have been accepted
        expected: &'static str,
    },

    /// The log filter does not parse.
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidLogFilter {
        /// Rejected filter
        filter: String,
        /// Parser message
        reason: String,
    },

    /// The configured backend is not compiled into this binary.
    #[error("Store backend '{0}' is not available in this build")]
    BackendUnavailable(StoreKind),
}

/// Ledger store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Volatile, process-local.
    Memory,
    /// Single file under the data directory.
    File,
    /// RocksDB database under the data directory.
    #[value(name = "rocksdb")]
    RocksDb,
}

impl StoreKind {
    /// Configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Memory => "memory",
            StoreKind::File => "file",
            StoreKind::RocksDb => "rocksdb",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "file" => Ok(StoreKind::File),
            "rocksdb" => Ok(StoreKind::RocksDb),
            _ => Err(ConfigError::InvalidValue {
                var: "MEDTRACE_STORE",
                value: s.to_string(),
                expected: "memory, file or rocksdb",
            }),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Backend to open.
    pub kind: StoreKind,
    /// Directory holding persistent stores.
    pub data_dir: PathBuf,
    /// fsync after each write.
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::File,
            data_dir: PathBuf::from("./data"),
            sync_writes: true,
        }
    }
}

impl StorageConfig {
    /// Path of the file store.
    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir.join("medtrace.ledger")
    }

    /// Path of the RocksDB database.
    pub fn rocksdb_path(&self) -> PathBuf {
        self.data_dir.join("rocksdb")
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `medtrace_ledger=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Ledger engine configuration.
    pub ledger: LedgerConfig,
}

impl NodeConfig {
    /// Create configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(kind) = lookup("MEDTRACE_STORE") {
            config.storage.kind = kind.parse()?;
        }
        if let Some(dir) = lookup("MEDTRACE_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(sync) = lookup("MEDTRACE_SYNC_WRITES") {
            config.storage.sync_writes = parse_bool("MEDTRACE_SYNC_WRITES", &sync)?;
        }

        if let Some(level) = lookup("MEDTRACE_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            config.logging.level = level;
        }
        if let Some(json) = lookup("MEDTRACE_JSON_LOGS") {
            config.logging.json = parse_bool("MEDTRACE_JSON_LOGS", &json)?;
        }

        if let Some(issuer) = lookup("MEDTRACE_RECALL_ISSUER").filter(|i| !i.trim().is_empty()) {
            config.ledger = config.ledger.with_recall_issuer(issuer);
        }

        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            expected: "true or false",
        }),
    }
}
