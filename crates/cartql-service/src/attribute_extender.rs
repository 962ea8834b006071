//! Attribute list extension trait.

use async_trait::async_trait;
use cartql_core::{CartqlResult, Interface};

/// Post-processes an attribute code list assembled elsewhere.
///
/// The host passes the list it computed and uses the returned one in its
/// place.
#[async_trait]
pub trait AttributeListExtender: Interface + Send + Sync {
    /// Returns `existing` extended with additional codes, each distinct
    /// value appearing once.
    async fn extend(&self, existing: Vec<String>) -> CartqlResult<Vec<String>>;
}
