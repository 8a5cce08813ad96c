//! Fact store backends.

#[cfg(feature = "tokio-runtime")]
pub mod file;
pub mod memory;

#[cfg(feature = "tokio-runtime")]
pub use file::FileStore;
pub use memory::InMemoryStore;
