//! Configuration models for the allocator and its store backend.

pub mod allocator;

pub use allocator::{AllocatorConfig, StoreBackendConfig};
