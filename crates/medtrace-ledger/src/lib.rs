//! # MedTrace Ledger
//!
//! Traceability ledger for individual medication units.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A medication unit is identified by its natural key (GTIN, batch, serial
//! number). The ledger records its commissioning, every custody hand-off
//! (ship, receive, dispense) and any recall, and answers whether a unit is
//! still valid and who currently holds it.
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Stable identity | Same `(gtin, batch, serial)` always maps to the same id |
//! | No double commission | A second commission of an existing id is rejected |
//! | Commission first | The first event of every log is a `commission` event |
//! | Append-only log | Events are never reordered or removed |
//! | Location mirroring | `Medication::location` equals the last appended event's location |
//! | One-way recall | `commissioned → recalled`, never back |
//! | Ledger-side time | Event timestamps come from the ledger clock, never the caller |
//!
//! ## Crate Structure
//!
//! ```text
//! medtrace-ledger/
//! ├── domain/          # Entities, value objects, identity hashing, invariants, errors
//! ├── ports/           # Inbound API traits + outbound dependency traits
//! ├── application/     # TraceabilityService (engine + queries), keyed locks
//! ├── adapters/        # In-memory store, clocks, provenance tokens, event publishers
//! └── config.rs        # LedgerConfig
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use medtrace_ledger::{CommissionRequest, LedgerConfig, TraceabilityApi, TraceabilityService};
//!
//! let service = TraceabilityService::new_in_memory(LedgerConfig::default());
//! let id = service.commission_medication(request).await?;
//! let result = service.verify_medication(id.as_str()).await?;
//! assert!(result.is_valid);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{
    BroadcastEventPublisher, InMemoryLedgerStore, ManualClock, NoopEventPublisher,
    RandomProvenance, SequentialProvenance, SystemTimeSource,
};
pub use application::{KeyedLocks, TraceabilityDependencies, TraceabilityService};
pub use config::LedgerConfig;
pub use domain::{
    medication_id, CommissionRequest, EventKind, KeyPrefix, LedgerError, LedgerErrorKind,
    LedgerEvent, Medication, MedicationId, MedicationStatus, StoreError, TrackingEvent,
    TransactionHash, VerificationResult, VerificationStats, DEFAULT_RECALL_ISSUER,
    RECALL_LOCATION,
};
pub use ports::{
    LedgerEventPublisher, LedgerQueryApi, LedgerStore, ProvenanceSource, TimeSource,
    TraceabilityApi,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
