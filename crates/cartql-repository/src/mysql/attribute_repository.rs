//! MySQL attribute repository implementation.

use crate::{traits::AttributeRepository, DatabasePoolInterface};
use async_trait::async_trait;
use cartql_core::CartqlResult;
use sqlx::{MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

/// Entity type whose attributes are looked up by default.
pub const PRODUCT_ENTITY_TYPE: &str = "catalog_product";

/// MySQL attribute repository backed by the EAV attribute tables.
#[derive(Clone)]
pub struct MySqlAttributeRepository {
    pool: Arc<dyn DatabasePoolInterface>,
    entity_type: String,
}

impl MySqlAttributeRepository {
    /// Creates a repository over product attributes.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self::with_entity_type(pool, PRODUCT_ENTITY_TYPE)
    }

    /// Creates a repository over the attributes of another entity type.
    #[must_use]
    pub fn with_entity_type(pool: Arc<dyn DatabasePoolInterface>, entity_type: impl Into<String>) -> Self {
        Self {
            pool,
            entity_type: entity_type.into(),
        }
    }

    /// Returns the entity type code this repository filters on.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn existing_codes_query(&self, candidates: &[String]) -> QueryBuilder<'static, MySql> {
        let mut builder = QueryBuilder::new(
            r#"
            SELECT DISTINCT ea.attribute_code
            FROM eav_attribute ea
            INNER JOIN eav_entity_type et ON et.entity_type_id = ea.entity_type_id
            WHERE et.entity_type_code = "#,
        );
        builder.push_bind(self.entity_type.clone());
        builder.push(" AND ea.attribute_code IN (");

        let mut codes = builder.separated(", ");
        for code in candidates {
            codes.push_bind(code.clone());
        }
        codes.push_unseparated(")");

        builder
    }
}

#[async_trait]
impl AttributeRepository for MySqlAttributeRepository {
    async fn find_existing_codes(&self, candidates: &[String]) -> CartqlResult<Vec<String>> {
        // `IN ()` is not valid SQL.
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            entity_type = %self.entity_type,
            candidates = candidates.len(),
            "Looking up existing attribute codes"
        );

        let mut query = self.existing_codes_query(candidates);
        let codes: Vec<String> = query
            .build_query_scalar::<String>()
            .fetch_all(self.pool.inner())
            .await?;

        debug!(found = codes.len(), "Attribute code lookup finished");
        Ok(codes)
    }
}
