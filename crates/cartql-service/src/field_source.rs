//! Source of the field names referenced by the current query.

use cartql_core::Interface;
use parking_lot::RwLock;

/// Supplies the field names the executing GraphQL query references.
///
/// Implementations only report; memoization happens in the consumer.
pub trait RequestedFieldSource: Interface + Send + Sync {
    /// Field names in query order. May contain duplicates.
    fn requested_fields(&self) -> Vec<String>;
}

/// Request-scoped holder filled by the host once the query is parsed.
#[derive(Debug, Default)]
pub struct RequestFields {
    fields: RwLock<Vec<String>>,
}

impl RequestFields {
    /// Creates a holder with no fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a holder with the given fields.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let holder = Self::new();
        holder.set_fields(fields);
        holder
    }

    /// Replaces the held fields.
    pub fn set_fields<I, S>(&self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.fields.write() = fields.into_iter().map(Into::into).collect();
    }

    /// Removes all held fields.
    pub fn clear(&self) {
        self.fields.write().clear();
    }
}

impl RequestedFieldSource for RequestFields {
    fn requested_fields(&self) -> Vec<String> {
        self.fields.read().clone()
    }
}
