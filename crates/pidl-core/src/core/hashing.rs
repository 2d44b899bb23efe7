// crates/pidl-core/src/core/hashing.rs
// ============================================================================
// Module: PIDL Document Digests
// Description: RFC 8785 canonical JSON digests for resolved documents.
// Purpose: Fingerprint resolution output for audit records and round-trip checks.
// Dependencies: crate::core::document, serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Documents are canonicalized with RFC 8785 (JCS) before hashing, so two
//! resolutions that produce the same content produce the same digest even
//! when map ordering differs between serializers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

use crate::core::document::DescriptorDocument;

// ============================================================================
// SECTION: Digest Types
// ============================================================================

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256.
    #[default]
    Sha256,
}

/// Hex-encoded digest tagged with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Algorithm.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub value: String,
}

/// Digest failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Canonical JSON encoding failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hashing
// ============================================================================

/// Returns RFC 8785 canonical JSON bytes.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Hashes the canonical JSON form of `value`.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn hash_canonical_json<T: Serialize + ?Sized>(
    algorithm: HashAlgorithm,
    value: &T,
) -> Result<HashDigest, HashError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(hash_bytes(algorithm, &bytes))
}

/// Hashes raw bytes.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> HashDigest {
    let digest = match algorithm {
        HashAlgorithm::Sha256 => Sha256::digest(bytes),
    };
    let mut value = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(value, "{byte:02x}");
    }
    HashDigest {
        algorithm,
        value,
    }
}

/// Digests a resolved document list for audit records.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn document_digest(
    algorithm: HashAlgorithm,
    documents: &[DescriptorDocument],
) -> Result<HashDigest, HashError> {
    hash_canonical_json(algorithm, documents)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::HashAlgorithm;
    use super::hash_bytes;
    use super::hash_canonical_json;

    #[test]
    fn sha256_matches_known_vector() {
        let digest = hash_bytes(HashAlgorithm::Sha256, b"abc");
        assert_eq!(digest.value, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn canonical_digest_ignores_key_order() {
        let first: serde_json::Value = serde_json::from_str(r#"{"b":1,"a":2}"#).unwrap();
        let second: serde_json::Value = serde_json::from_str(r#"{"a":2,"b":1}"#).unwrap();
        assert_eq!(
            hash_canonical_json(HashAlgorithm::Sha256, &first).unwrap(),
            hash_canonical_json(HashAlgorithm::Sha256, &second).unwrap()
        );
    }
}
