//! # Ledger Configuration
//!
//! Tunables for the traceability engine. Storage and logging settings belong
//! to the host process, not to this crate.

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_RECALL_ISSUER, RECALL_LOCATION};

/// Traceability engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Issuer recorded on a recall when the caller does not name one.
    pub default_recall_issuer: String,

    /// Location recorded on every recall event.
    pub recall_location: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_recall_issuer: DEFAULT_RECALL_ISSUER.to_string(),
            recall_location: RECALL_LOCATION.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Configuration used by unit and integration tests.
    pub fn for_testing() -> Self {
        Self::default()
    }

    /// Override the default recall issuer.
    pub fn with_recall_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.default_recall_issuer = issuer.into();
        self
    }

    /// Override the recall location.
    pub fn with_recall_location(mut self, location: impl Into<String>) -> Self {
        self.recall_location = location.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.default_recall_issuer, "DIGEMID");
        assert_eq!(config.recall_location, "Sistema Central");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: LedgerConfig =
            serde_json::from_str(r#"{"defaultRecallIssuer":"ignored","recall_location":"Hub"}"#)
                .unwrap();
        assert_eq!(config.default_recall_issuer, "DIGEMID");
        assert_eq!(config.recall_location, "Hub");
    }

    #[test]
    fn test_builders() {
        let config = LedgerConfig::default()
            .with_recall_issuer("FDA")
            .with_recall_location("HQ");
        assert_eq!(config.default_recall_issuer, "FDA");
        assert_eq!(config.recall_location, "HQ");
    }
}
