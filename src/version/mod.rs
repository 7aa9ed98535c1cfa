//! Content-addressed version derivation for migrations.
//!
//! A migration's version is a pure function of its identity and description:
//! SHA-256 over the identity bytes followed by the description bytes,
//! hex-encoded and truncated to the first 8 characters. Re-running with
//! unchanged inputs reproduces the same token across processes and machines.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the full digest.
///
/// 8 hex characters is 32 bits of entropy. For realistic migration-set sizes
/// the collision probability is negligible; this is a documented trade-off,
/// not a uniqueness guarantee at scale.
pub const VERSION_LEN: usize = 8;

/// Compute the version token for a migration from its stable identity
/// and its human-readable description.
pub fn compute_version(identity: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    hasher.update(description.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..VERSION_LEN].to_string()
}
