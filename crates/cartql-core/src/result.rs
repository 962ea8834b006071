//! Result type aliases for Cartql.

use crate::CartqlError;

/// A specialized `Result` type for Cartql operations.
pub type CartqlResult<T> = Result<T, CartqlError>;
