//! Core distribution engine for the distribution service.
//!
//! This module provides the orchestration logic of the distributor: the
//! batch scheduler that polls for work under a gas price ceiling, the
//! distribution engine that turns one batch into one on-chain transaction,
//! and the builder that wires both from configuration using pluggable
//! implementation factories.

pub mod builder;
pub mod engine;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_util;

pub use builder::{BuilderError, DistributorBuilder, DistributorFactories};
pub use engine::DistributionEngine;
pub use scheduler::{BatchScheduler, SchedulerSettings, TickOutcome};
