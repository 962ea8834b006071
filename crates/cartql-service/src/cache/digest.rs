//! Digest of a requested field list.

use cartql_core::CartqlResult;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the JSON encoding of `fields`.
///
/// Order and duplicates are significant.
pub fn fields_digest(fields: &[String]) -> CartqlResult<String> {
    let encoded = serde_json::to_vec(fields)?;
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    Ok(format!("{:x}", hasher.finalize()))
}
