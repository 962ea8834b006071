//! MySQL repository implementations.

mod attribute_repository;

pub use attribute_repository::*;
