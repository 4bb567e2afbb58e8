//! # Identity Hasher
//!
//! Maps the natural key `(gtin, batch, serial)` to a fixed-width medication id.
//!
//! The id is the first 16 bytes of `SHA-256(gtin ␟ batch ␟ serial)` in
//! lowercase hex. The unit separator (U+001F) never appears in GS1 identifiers,
//! so shifting characters between fields always changes the digest input.

use sha2::{Digest, Sha256};

use super::value_objects::MedicationId;

/// Number of digest bytes kept in an id.
pub const ID_HASH_BYTES: usize = 16;

/// Length of a medication id in characters.
pub const ID_LENGTH: usize = ID_HASH_BYTES * 2;

const FIELD_SEPARATOR: &[u8] = b"\x1f";

/// Derive the medication id for a natural key. Pure and deterministic.
pub fn medication_id(gtin: &str, batch: &str, serial_number: &str) -> MedicationId {
    let mut hasher = Sha256::new();
    hasher.update(gtin.as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(batch.as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(serial_number.as_bytes());
    let digest = hasher.finalize();
    MedicationId::new(hex::encode(&digest[..ID_HASH_BYTES]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = medication_id("7501001234567", "PCT2024001", "123456789");
        let b = medication_id("7501001234567", "PCT2024001", "123456789");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_width_hex() {
        let id = medication_id("7501001234567", "PCT2024001", "123456789");
        assert_eq!(id.as_str().len(), ID_LENGTH);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(medication_id("a", "b", "c"), medication_id("b", "a", "c"));
        assert_ne!(medication_id("a", "b", "c"), medication_id("a", "c", "b"));
    }

    #[test]
    fn test_field_boundaries_matter() {
        assert_ne!(medication_id("a-b", "c", "d"), medication_id("a", "b-c", "d"));
        assert_ne!(medication_id("ab", "c", "d"), medication_id("a", "bc", "d"));
    }

    #[test]
    fn test_empty_fields_still_hash() {
        assert_eq!(medication_id("", "", "").as_str().len(), ID_LENGTH);
    }
}
