//! Single-slot memo for storage-confirmed attribute codes.
//!
//! The memo is keyed by a digest of the requested field list and replaced
//! as one value, so a digest is never observed next to another field set's
//! attributes.

mod digest;
mod snapshot;

pub use digest::fields_digest;
pub use snapshot::{AttributeSnapshot, CacheStats, SnapshotCache};
