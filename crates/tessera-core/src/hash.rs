//! Content fingerprints for schemas.
//!
//! Unlike `std::hash::Hash`, a fingerprint is stable across processes and
//! builds, so it can be persisted next to catalog entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// BLAKE3 digest of a value's canonical JSON encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint `bytes` under a domain tag, so equal payloads of different
    /// kinds never collide.
    pub fn of_bytes(domain: &str, bytes: &[u8]) -> Self {
        let mut h = blake3::Hasher::new();
        h.update(domain.as_bytes());
        h.update(&[0]);
        h.update(bytes);
        Self(*h.finalize().as_bytes())
    }

    pub fn of_serde<T: Serialize>(domain: &str, value: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(value)?;
        Ok(Self::of_bytes(domain, &bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 8 hex digits, for log lines.
    pub fn short(&self) -> String {
        self.to_string()[..8].to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
