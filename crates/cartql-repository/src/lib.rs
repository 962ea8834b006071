//! # Cartql Repository
//!
//! Attribute storage behind a single lookup:
//!
//! ```text
//! AttributeCodeFilter
//!   ↓  Arc<dyn AttributeRepository>   (storage interface)
//! MySqlAttributeRepository            (eav_attribute via SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```
//!
//! [`InMemoryAttributeRepository`] serves hosts without a database and tests.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::InMemoryAttributeRepository;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
