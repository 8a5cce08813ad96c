//! Allocator configuration structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{AllocResult, AllocatorError, Iri};

/// Environment variable naming the master task list.
pub const ENV_TASK_LIST_IRI: &str = "ALLOCATOR_TASK_LIST_IRI";
/// Environment variable naming the schedule identifier base.
pub const ENV_SCHEDULE_BASE_IRI: &str = "ALLOCATOR_SCHEDULE_BASE_IRI";
/// Environment variable overriding the per-agent quota.
pub const ENV_TASKS_PER_AGENT: &str = "ALLOCATOR_TASKS_PER_AGENT";
/// Environment variable overriding the agent registry bound.
pub const ENV_MAX_TRACKED_AGENTS: &str = "ALLOCATOR_MAX_TRACKED_AGENTS";
/// Environment variable selecting the file store root.
pub const ENV_STORE_PATH: &str = "ALLOCATOR_STORE_PATH";

const fn default_tasks_per_agent() -> usize {
    5
}

const fn default_max_tracked_agents() -> usize {
    1024
}

/// Store backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// In-memory store for development/testing.
    #[default]
    InMemory,
    /// JSON-lines documents under a directory.
    File {
        /// Root directory for document files.
        path: PathBuf,
    },
}

/// Allocator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Master list holding every eligible task.
    pub task_list_iri: String,
    /// Prefix for minted per-agent schedule identifiers.
    pub schedule_base_iri: String,
    /// Maximum tasks an agent may hold assigned at once.
    #[serde(default = "default_tasks_per_agent")]
    pub tasks_per_agent: usize,
    /// Maximum agent identities kept before eviction.
    #[serde(default = "default_max_tracked_agents")]
    pub max_tracked_agents: usize,
    /// Store backend selection.
    #[serde(default)]
    pub store: StoreBackendConfig,
}

impl AllocatorConfig {
    /// Configuration with default limits and the in-memory store.
    pub fn new(task_list_iri: impl Into<String>, schedule_base_iri: impl Into<String>) -> Self {
        Self {
            task_list_iri: task_list_iri.into(),
            schedule_base_iri: schedule_base_iri.into(),
            tasks_per_agent: default_tasks_per_agent(),
            max_tracked_agents: default_max_tracked_agents(),
            store: StoreBackendConfig::InMemory,
        }
    }

    /// Set the per-agent quota.
    #[must_use]
    pub const fn with_tasks_per_agent(mut self, tasks_per_agent: usize) -> Self {
        self.tasks_per_agent = tasks_per_agent;
        self
    }

    /// Set the agent registry bound.
    #[must_use]
    pub const fn with_max_tracked_agents(mut self, max_tracked_agents: usize) -> Self {
        self.max_tracked_agents = max_tracked_agents;
        self
    }

    /// Select the store backend.
    #[must_use]
    pub fn with_store(mut self, store: StoreBackendConfig) -> Self {
        self.store = store;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AllocResult<()> {
        Iri::parse(&self.task_list_iri)?.document()?;
        // Minted identifiers append a token and a fragment; a query or fragment
        // on the base would put every agent's schedule in one document.
        let base = Iri::parse(&self.schedule_base_iri)?;
        if base.fragment().is_some() || base.query().is_some() {
            return Err(AllocatorError::InvalidConfig(
                "schedule_base_iri must not carry a query or fragment".into(),
            ));
        }
        if self.tasks_per_agent == 0 {
            return Err(AllocatorError::InvalidConfig(
                "tasks_per_agent must be greater than 0".into(),
            ));
        }
        if self.max_tracked_agents == 0 {
            return Err(AllocatorError::InvalidConfig(
                "max_tracked_agents must be greater than 0".into(),
            ));
        }
        if let StoreBackendConfig::File { path } = &self.store {
            if path.as_os_str().is_empty() {
                return Err(AllocatorError::InvalidConfig("store path must not be empty".into()));
            }
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> AllocResult<Self> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| AllocatorError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `ALLOCATOR_*` environment variables, loading a
    /// `.env` file first when one is present.
    pub fn from_env() -> AllocResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup and validate.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AllocResult<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| AllocatorError::InvalidConfig(format!("{key} is not set")))
        };
        let parsed = |key: &str, default: usize| -> AllocResult<usize> {
            lookup(key).map_or(Ok(default), |raw| {
                raw.trim()
                    .parse()
                    .map_err(|e| AllocatorError::InvalidConfig(format!("{key}: {e}")))
            })
        };

        let cfg = Self {
            task_list_iri: required(ENV_TASK_LIST_IRI)?,
            schedule_base_iri: required(ENV_SCHEDULE_BASE_IRI)?,
            tasks_per_agent: parsed(ENV_TASKS_PER_AGENT, default_tasks_per_agent())?,
            max_tracked_agents: parsed(ENV_MAX_TRACKED_AGENTS, default_max_tracked_agents())?,
            store: lookup(ENV_STORE_PATH).map_or(StoreBackendConfig::InMemory, |path| {
                StoreBackendConfig::File { path: path.into() }
            }),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
