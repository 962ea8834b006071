//! In-memory attribute repository.

use crate::traits::AttributeRepository;
use async_trait::async_trait;
use cartql_core::CartqlResult;
use parking_lot::RwLock;
use std::collections::HashSet;

/// Attribute repository over a fixed, mutable set of known codes.
#[derive(Debug, Default)]
pub struct InMemoryAttributeRepository {
    codes: RwLock<HashSet<String>>,
}

impl InMemoryAttributeRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository that knows the given codes.
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: RwLock::new(codes.into_iter().map(Into::into).collect()),
        }
    }

    /// Registers an attribute code.
    pub fn add_code(&self, code: impl Into<String>) {
        self.codes.write().insert(code.into());
    }

    /// Forgets an attribute code. Returns `true` if it was known.
    pub fn remove_code(&self, code: &str) -> bool {
        self.codes.write().remove(code)
    }

    /// Number of known codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.read().len()
    }

    /// Returns true if no codes are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.read().is_empty()
    }
}

#[async_trait]
impl AttributeRepository for InMemoryAttributeRepository {
    async fn find_existing_codes(&self, candidates: &[String]) -> CartqlResult<Vec<String>> {
        let codes = self.codes.read();
        let mut seen = HashSet::new();
        Ok(candidates
            .iter()
            .filter(|code| codes.contains(code.as_str()) && seen.insert(code.as_str()))
            .cloned()
            .collect())
    }
}
