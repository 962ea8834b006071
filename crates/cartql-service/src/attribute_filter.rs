//! Requested attribute code filter.
//!
//! Takes the field names of the current GraphQL query, keeps the ones that
//! look like attribute codes, asks storage which of them exist, and appends
//! those to the attribute list the quote layer already assembled.
//!
//! ```text
//! requested fields ──► digest ──► snapshot hit? ──yes──► merge
//!                                      │no
//!                                      ▼
//!                       validate ──► storage lookup ──► store snapshot ──► merge
//! ```

use crate::attribute_extender::AttributeListExtender;
use crate::cache::{fields_digest, AttributeSnapshot, CacheStats, SnapshotCache};
use crate::field_source::RequestedFieldSource;
use async_trait::async_trait;
use cartql_config::AttributeCodeConfig;
use cartql_core::{AttributeCodeRule, CartqlResult};
use cartql_repository::AttributeRepository;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Memoizing filter that extends attribute lists with requested codes.
///
/// Safe to share between tasks: the memo is swapped as one value and the
/// storage lookup runs without holding any lock. Two concurrent misses may
/// both query storage; the later write wins.
pub struct AttributeCodeFilter {
    field_source: Arc<dyn RequestedFieldSource>,
    repository: Arc<dyn AttributeRepository>,
    rule: AttributeCodeRule,
    cache: SnapshotCache,
}

impl AttributeCodeFilter {
    /// Creates a filter with the default attribute code rule.
    pub fn new(
        field_source: Arc<dyn RequestedFieldSource>,
        repository: Arc<dyn AttributeRepository>,
    ) -> Self {
        Self::with_rule(field_source, repository, AttributeCodeRule::default())
    }

    /// Creates a filter with a custom attribute code rule.
    pub fn with_rule(
        field_source: Arc<dyn RequestedFieldSource>,
        repository: Arc<dyn AttributeRepository>,
        rule: AttributeCodeRule,
    ) -> Self {
        Self {
            field_source,
            repository,
            rule,
            cache: SnapshotCache::new(),
        }
    }

    /// Creates a filter whose length bounds come from configuration.
    pub fn from_config(
        field_source: Arc<dyn RequestedFieldSource>,
        repository: Arc<dyn AttributeRepository>,
        config: &AttributeCodeConfig,
    ) -> CartqlResult<Self> {
        let rule = AttributeCodeRule::new(config.length()?);
        Ok(Self::with_rule(field_source, repository, rule))
    }

    /// Returns the rule candidate codes are checked against.
    #[must_use]
    pub fn rule(&self) -> AttributeCodeRule {
        self.rule
    }

    /// Keeps the fields that pass the rule, once each, in first-seen order.
    #[must_use]
    pub fn validated_codes(&self, fields: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        fields
            .iter()
            .filter(|field| self.rule.is_valid(field))
            .filter(|field| seen.insert(field.as_str()))
            .cloned()
            .collect()
    }

    /// Returns the memo's hit/miss counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forgets the memoized attributes; the next call queries storage.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    async fn confirmed_attributes(&self, fields: &[String]) -> CartqlResult<Arc<AttributeSnapshot>> {
        let digest = fields_digest(fields)?;
        if let Some(snapshot) = self.cache.lookup(&digest) {
            return Ok(snapshot);
        }

        let candidates = self.validated_codes(fields);
        debug!(
            requested = fields.len(),
            candidates = candidates.len(),
            "Querying attribute storage"
        );

        let attributes = self.repository.find_existing_codes(&candidates).await?;
        Ok(self.cache.store(AttributeSnapshot::new(digest, attributes)))
    }
}

#[async_trait]
impl AttributeListExtender for AttributeCodeFilter {
    #[instrument(skip_all, fields(existing = existing.len()))]
    async fn extend(&self, existing: Vec<String>) -> CartqlResult<Vec<String>> {
        let fields = self.field_source.requested_fields();
        let snapshot = self.confirmed_attributes(&fields).await?;
        Ok(merge_unique(existing, snapshot.attributes()))
    }
}

/// Concatenates both lists, keeping the first occurrence of each value.
fn merge_unique(existing: Vec<String>, extra: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(existing.len() + extra.len());
    let mut merged = Vec::with_capacity(existing.len() + extra.len());
    for code in existing.into_iter().chain(extra.iter().cloned()) {
        if seen.insert(code.clone()) {
            merged.push(code);
        }
    }
    merged
}
