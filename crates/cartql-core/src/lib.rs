//! # Cartql Core
//!
//! Core types, error definitions, and attribute-code rules for Cartql.
//! This crate provides the foundational abstractions shared by the
//! configuration, repository and service layers.

pub mod error;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use error::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
