//! Builders to construct an allocator from configuration.

use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::config::{AllocatorConfig, StoreBackendConfig};
use crate::core::{AllocResult, Allocator, AllocatorError, FactStore, ScheduleLimits};
use crate::infra::InMemoryStore;

/// Derive schedule limits from configuration.
pub fn limits_from_config(cfg: &AllocatorConfig) -> AllocResult<ScheduleLimits> {
    let max_tracked_agents = NonZeroUsize::new(cfg.max_tracked_agents).ok_or_else(|| {
        AllocatorError::InvalidConfig("max_tracked_agents must be greater than 0".into())
    })?;
    Ok(ScheduleLimits {
        tasks_per_agent: cfg.tasks_per_agent,
        max_tracked_agents,
    })
}

/// Build an allocator from configuration using a provided store factory.
pub fn build_allocator<F>(cfg: &AllocatorConfig, store_factory: F) -> AllocResult<Allocator>
where
    F: FnOnce(&AllocatorConfig) -> AllocResult<Arc<dyn FactStore>>,
{
    cfg.validate()?;
    let limits = limits_from_config(cfg)?;
    let store = store_factory(cfg)?;
    tracing::info!(
        "allocator over {} (quota {}, up to {} agents)",
        cfg.task_list_iri,
        limits.tasks_per_agent,
        limits.max_tracked_agents
    );
    Ok(Allocator::new(
        store,
        cfg.task_list_iri.clone(),
        cfg.schedule_base_iri.clone(),
        limits,
    ))
}

/// Open the store backend named by configuration.
pub async fn build_store(cfg: &AllocatorConfig) -> AllocResult<Arc<dyn FactStore>> {
    match &cfg.store {
        StoreBackendConfig::InMemory => Ok(Arc::new(InMemoryStore::new())),
        #[cfg(feature = "tokio-runtime")]
        StoreBackendConfig::File { path } => {
            Ok(Arc::new(crate::infra::FileStore::open(path).await?))
        }
        #[cfg(not(feature = "tokio-runtime"))]
        StoreBackendConfig::File { .. } => Err(AllocatorError::InvalidConfig(
            "file store requires the `tokio-runtime` feature".into(),
        )),
    }
}

/// Validate configuration, open its store, and build the allocator.
pub async fn build_from_config(cfg: &AllocatorConfig) -> AllocResult<Allocator> {
    cfg.validate()?;
    let store = build_store(cfg).await?;
    build_allocator(cfg, move |_| Ok(store))
}
