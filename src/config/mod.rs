/// Configuration module - Resolve and validate the shred configuration
pub mod schema;
pub mod loader;

pub use schema::{WipeConfig, DEFAULT_CHUNK_SIZE};
pub use loader::resolve_config;
