//! Repository trait definitions.

use async_trait::async_trait;
use cartql_core::{CartqlResult, Interface};

/// Attribute storage lookup.
#[async_trait]
pub trait AttributeRepository: Interface + Send + Sync {
    /// Returns the subset of `candidates` that exist as attribute codes.
    ///
    /// The result holds each code once; order is not guaranteed. An empty
    /// candidate slice yields an empty result.
    async fn find_existing_codes(&self, candidates: &[String]) -> CartqlResult<Vec<String>>;
}
