//! Common types module for the distribution service.
//!
//! This module defines the core data types and structures shared by the
//! distributor components. It provides a centralized location for shared
//! types to ensure consistency across all crates in the workspace.

/// Batch formation types and invariants.
pub mod batch;
/// Chain-facing types for transaction construction and submission.
pub mod chain;
/// Recipient feed wire types.
pub mod feed;
/// Gas price representation.
pub mod gas;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Secure string type for private keys and API credentials.
pub mod secret;
/// Utility functions for hex formatting and log display.
pub mod utils;
/// Configuration validation types for implementation config sections.
pub mod validation;

// Re-export all types for convenient access
pub use alloy_primitives::{Address, U256};
pub use batch::*;
pub use chain::*;
pub use feed::*;
pub use gas::*;
pub use registry::*;
pub use secret::*;
pub use utils::*;
pub use validation::*;
