//! Unified error types for all layers of the application.

use thiserror::Error;

/// Unified error type for all layers of Cartql.
///
/// Rejected attribute codes are filtered out, never reported through this type.
#[derive(Error, Debug)]
pub enum CartqlError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CartqlError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for CartqlError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Configuration(_) => Self::Configuration(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for CartqlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CartqlError::not_found("Attribute", "color").error_code(), "NOT_FOUND");
        assert_eq!(CartqlError::validation("bad input").error_code(), "VALIDATION_ERROR");
        assert_eq!(CartqlError::Database("db".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(
            CartqlError::configuration("min > max").error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(CartqlError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_retriable_errors() {
        assert!(CartqlError::Database("connection lost".to_string()).is_retriable());
        assert!(!CartqlError::configuration("min > max").is_retriable());
        assert!(!CartqlError::not_found("Attribute", "color").is_retriable());
        assert!(!CartqlError::validation("bad input").is_retriable());
    }

    #[test]
    fn test_error_constructors() {
        let not_found = CartqlError::not_found("Attribute", "color");
        assert!(not_found.to_string().contains("Attribute"));
        assert!(not_found.to_string().contains("color"));

        let configuration = CartqlError::configuration("length bounds");
        assert!(configuration.to_string().contains("length bounds"));

        let internal = CartqlError::internal("panic");
        assert!(internal.to_string().contains("panic"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let converted = CartqlError::from(err);
        assert_eq!(converted.error_code(), "INTERNAL_ERROR");
        assert!(converted.to_string().contains("JSON serialization error"));
    }

    #[test]
    fn test_from_anyhow() {
        let err: CartqlError = anyhow::anyhow!("upstream exploded").into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.to_string(), "upstream exploded");
    }
}
