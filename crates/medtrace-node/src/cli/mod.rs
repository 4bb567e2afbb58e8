//! # Command-Line Front End
//!
//! `clap` definitions and dispatch. Every command prints one pretty JSON
//! document on stdout.

mod commands;

pub use commands::execute;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{NodeConfig, StoreKind};

/// MedTrace: medication traceability ledger
#[derive(Parser, Debug)]
#[command(name = "medtrace", version)]
#[command(about = "Commission, track, recall and verify medication units")]
pub struct Cli {
    /// Ledger store backend (overrides MEDTRACE_STORE)
    #[arg(long, value_enum, global = true)]
    pub store: Option<StoreKind>,

    /// Data directory for persistent stores (overrides MEDTRACE_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` (overrides MEDTRACE_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Apply command-line overrides on top of environment configuration.
    pub fn apply(&self, config: &mut NodeConfig) {
        if let Some(kind) = self.store {
            config.storage.kind = kind;
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

/// Ledger operations.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a new medication unit
    Commission {
        /// Global Trade Item Number
        #[arg(long)]
        gtin: String,
        /// Production batch
        #[arg(long)]
        batch: String,
        /// Unit serial number
        #[arg(long)]
        serial: String,
        /// Expiry date, YYYY-MM-DD
        #[arg(long)]
        expiry: String,
        /// Manufacturer name
        #[arg(long)]
        manufacturer: String,
        /// Commercial product name
        #[arg(long)]
        product: String,
        /// Commissioning site
        #[arg(long)]
        location: String,
    },

    /// Record a custody event (ship, receive, dispense, ...)
    Track {
        /// Medication id
        id: String,
        /// Event kind
        #[arg(long)]
        event: String,
        /// Where it happened
        #[arg(long)]
        location: String,
        /// Who is responsible
        #[arg(long)]
        actor: String,
        /// Opaque signature to store with the event
        #[arg(long)]
        signature: Option<String>,
    },

    /// Recall a medication unit
    Recall {
        /// Medication id
        id: String,
        /// Why the unit is recalled
        #[arg(long)]
        reason: String,
        /// Issuing authority (defaults to the configured issuer)
        #[arg(long)]
        issuer: Option<String>,
    },

    /// Verify authenticity, validity and current holder
    Verify {
        /// Medication id
        id: String,
    },

    /// Show one medication
    Get {
        /// Medication id
        id: String,
    },

    /// Show a medication's event log
    History {
        /// Medication id
        id: String,
    },

    /// List medications of one manufacturer (exact name)
    ByManufacturer {
        /// Manufacturer name
        name: String,
    },

    /// Search by product, manufacturer, batch or GTIN
    Search {
        /// Search terms; all must match
        #[arg(trailing_var_arg = true)]
        terms: Vec<String>,
    },

    /// Ledger-wide counts
    Stats,

    /// Run the end-to-end walk-through against a throwaway in-memory ledger
    Demo,
}
