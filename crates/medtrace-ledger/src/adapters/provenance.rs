//! Provenance token generators.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::TransactionHash;
use crate::ports::outbound::ProvenanceSource;

/// UUIDv4 tokens (122 random bits) as 32 lowercase hex characters, no dashes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomProvenance;

impl ProvenanceSource for RandomProvenance {
    fn next_token(&self) -> TransactionHash {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Predictable tokens (`tx-000001`, `tx-000002`, ...) for tests.
#[derive(Debug, Default)]
pub struct SequentialProvenance {
    counter: AtomicU64,
}

impl SequentialProvenance {
    /// Start counting from 1.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProvenanceSource for SequentialProvenance {
    fn next_token(&self) -> TransactionHash {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("tx-{n:06}")
    }
}
