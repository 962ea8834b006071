//! # Cartql Service
//!
//! Extends the attribute list of a quote/cart GraphQL response with the
//! attribute codes the current query asks for.

pub mod attribute_extender;
pub mod attribute_filter;
pub mod cache;
pub mod field_source;

pub use attribute_extender::*;
pub use attribute_filter::*;
pub use cache::*;
pub use field_source::*;
