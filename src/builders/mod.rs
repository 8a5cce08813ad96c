//! Builders to construct the allocator and its store from configuration.

pub mod allocator_builder;

pub use allocator_builder::{build_allocator, build_from_config, build_store, limits_from_config};
