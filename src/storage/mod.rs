//! Storage implementations

pub mod in_memory;
pub mod record;

pub use in_memory::InMemoryStore;
pub use record::{Record, RecordTransformer, Related};
