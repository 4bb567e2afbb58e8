//! # Traceability Service
//!
//! The main service implementing the traceability and query APIs.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `TraceabilityApi` for commission, tracking, recall and verification
//! 2. Implements `LedgerQueryApi` for lookups, search and statistics
//! 3. Serializes same-id writers through a keyed lock table
//! 4. Uses dependency injection for all external dependencies

mod engine;
mod helpers;
mod queries;

use crate::adapters::{
    InMemoryLedgerStore, NoopEventPublisher, RandomProvenance, SystemTimeSource,
};
use crate::application::locks::KeyedLocks;
use crate::config::LedgerConfig;
use crate::ports::outbound::{LedgerEventPublisher, LedgerStore, ProvenanceSource, TimeSource};

/// The Traceability Service.
///
/// Implements both `TraceabilityApi` (writes and verification) and
/// `LedgerQueryApi` (reads). Holds no ledger state of its own: every call
/// reads fresh state from the store.
pub struct TraceabilityService<S, P, C, E>
where
    S: LedgerStore,
    P: ProvenanceSource,
    C: TimeSource,
    E: LedgerEventPublisher,
{
    /// Key-value ledger store.
    pub(crate) store: S,
    /// Provenance token generator.
    pub(crate) provenance: P,
    /// Ledger clock.
    pub(crate) clock: C,
    /// Notification sink.
    pub(crate) publisher: E,
    /// Service configuration.
    pub(crate) config: LedgerConfig,
    /// Per-id write locks.
    pub(crate) locks: KeyedLocks,
}

/// Dependencies for TraceabilityService
pub struct TraceabilityDependencies<S, P, C, E> {
    /// Ledger store
    pub store: S,
    /// Provenance token generator
    pub provenance: P,
    /// Ledger clock
    pub clock: C,
    /// Notification sink
    pub publisher: E,
}

impl<S, P, C, E> TraceabilityService<S, P, C, E>
where
    S: LedgerStore,
    P: ProvenanceSource,
    C: TimeSource,
    E: LedgerEventPublisher,
{
    /// Create a new Traceability Service with the given dependencies.
    pub fn new(deps: TraceabilityDependencies<S, P, C, E>, config: LedgerConfig) -> Self {
        Self {
            store: deps.store,
            provenance: deps.provenance,
            clock: deps.clock,
            publisher: deps.publisher,
            config,
            locks: KeyedLocks::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }
}

impl TraceabilityService<InMemoryLedgerStore, RandomProvenance, SystemTimeSource, NoopEventPublisher> {
    /// Service over a fresh in-memory store with the system clock, random
    /// provenance tokens and no notification listeners.
    pub fn new_in_memory(config: LedgerConfig) -> Self {
        Self::new(
            TraceabilityDependencies {
                store: InMemoryLedgerStore::new(),
                provenance: RandomProvenance,
                clock: SystemTimeSource,
                publisher: NoopEventPublisher,
            },
            config,
        )
    }
}
