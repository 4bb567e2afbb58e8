//! # Domain Errors
//!
//! Error types for the traceability ledger.
//!
//! Four kinds reach callers: validation, conflict, not-found and storage.
//! Storage failures are propagated unchanged; the ledger never retries.

use thiserror::Error;

/// Errors returned by ledger store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Read or write against the backend failed.
    #[error("Ledger store I/O error: {message}")]
    Io {
        /// Backend-specific description
        message: String,
    },

    /// A stored record could not be encoded or decoded.
    #[error("Ledger store corruption: {message}")]
    Corruption {
        /// Description including the offending key
        message: String,
    },
}

impl StoreError {
    /// Create an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        StoreError::Io {
            message: message.into(),
        }
    }

    /// Create a corruption error.
    pub fn corruption(message: impl Into<String>) -> Self {
        StoreError::Corruption {
            message: message.into(),
        }
    }
}

/// Traceability ledger error types.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A required field is missing or malformed.
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Name of the offending input field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A medication with this identity is already commissioned.
    #[error("Medication with ID {medication_id} already exists")]
    Conflict {
        /// Colliding medication id
        medication_id: String,
    },

    /// The operation needs a medication that does not exist.
    #[error("Medication with ID {medication_id} not found")]
    NotFound {
        /// Requested medication id
        medication_id: String,
    },

    /// Underlying store failure.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Coarse error classification for callers that translate errors into
/// user-facing messages or transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerErrorKind {
    /// Missing or malformed input.
    Validation,
    /// Duplicate commission.
    Conflict,
    /// Unknown medication.
    NotFound,
    /// Backend failure.
    Storage,
}

impl LedgerError {
    /// Required field was empty.
    pub fn missing(field: &'static str) -> Self {
        LedgerError::Validation {
            field,
            reason: "must not be empty".to_string(),
        }
    }

    /// Field was present but malformed.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LedgerError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Unknown medication id.
    pub fn not_found(medication_id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            medication_id: medication_id.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> LedgerErrorKind {
        match self {
            LedgerError::Validation { .. } => LedgerErrorKind::Validation,
            LedgerError::Conflict { .. } => LedgerErrorKind::Conflict,
            LedgerError::NotFound { .. } => LedgerErrorKind::NotFound,
            LedgerError::Storage(_) => LedgerErrorKind::Storage,
        }
    }
}
