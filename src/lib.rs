//! # Prometheus Task Allocator
//!
//! Quota-bounded allocation of tasks to a pool of independent agents, on top
//! of a document-oriented fact store.
//!
//! Tasks are resources carrying a single `status` fact. A master task list
//! links every task via `hasTask`; each agent gets its own schedule list that
//! the allocator rebuilds on every cycle.
//!
//! ## Allocation Cycle
//!
//! - **Plan**: read the tasks still `assigned` on the agent's schedule and the
//!   `created` tasks on the master list
//! - **Claim**: move free tasks `created -> assigned` with an atomic
//!   compare-and-swap until the agent's quota is full, skipping tasks another
//!   agent claimed first
//! - **Publish**: replace the agent's schedule document with the batch and
//!   wait for every link to land
//!
//! Assigned tasks stay on an agent's schedule (sticky retention) until they
//! are released with [`core::Allocator::release_assigned_tasks`] or
//! [`core::Allocator::release_agent_tasks`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prometheus_task_allocator::core::{Allocator, ScheduleLimits, ScheduleOptions};
//! use prometheus_task_allocator::infra::InMemoryStore;
//!
//! let allocator = Allocator::new(
//!     Arc::new(InMemoryStore::new()),
//!     "http://example.org/tasks#list",
//!     "http://example.org/schedules/",
//!     ScheduleLimits::default(),
//! );
//!
//! let batch = allocator.schedule(&ScheduleOptions::for_agent("agent-1")).await?;
//! ```
//!
//! For complete examples, see:
//! - `tests/allocator_test.rs` - scheduling scenarios and properties
//! - `tests/unit/` - configuration, builders, audit, and store backends

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Allocation core: facts, store port, queries, and the allocator facade.
pub mod core;
/// Configuration models for the allocator and its store backend.
pub mod config;
/// Builders to construct the allocator from configuration.
pub mod builders;
/// Infrastructure adapters for fact storage backends.
pub mod infra;
/// API surface for transports wrapping the allocator.
pub mod runtime;
/// Shared utilities.
pub mod util;
