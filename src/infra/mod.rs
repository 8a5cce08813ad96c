//! Infrastructure adapters for fact storage backends.

pub mod store;

pub use store::InMemoryStore;
#[cfg(feature = "tokio-runtime")]
pub use store::FileStore;
