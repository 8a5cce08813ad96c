//! API surface for transports wrapping the allocator.

pub mod api;

pub use api::{
    health, release_all, schedule_agent, Health, ReleaseResponse, ScheduleRequest,
    ScheduleResponse,
};
