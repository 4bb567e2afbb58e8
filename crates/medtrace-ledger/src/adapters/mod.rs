//! # Adapters
//!
//! In-process implementations of the outbound ports. Persistent storage lives
//! in the host (`medtrace-node`).

pub mod clock;
pub mod memory_store;
pub mod provenance;
pub mod publisher;

pub use clock::{ManualClock, SystemTimeSource};
pub use memory_store::InMemoryLedgerStore;
pub use provenance::{RandomProvenance, SequentialProvenance};
pub use publisher::{BroadcastEventPublisher, NoopEventPublisher};
