//! Gas price oracle module for the distribution service.
//!
//! This module provides interfaces and implementations for fetching the
//! current recommended network gas price. The scheduler consults the oracle
//! on every poll and uses the result for admission control against the
//! configured ceiling; oracle failures are never fatal, they skip the
//! current poll cycle.

use async_trait::async_trait;
use distro_types::{ConfigSchema, GasPrice, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod fixed;
	pub mod station;
}

/// Errors that can occur during gas price oracle operations.
#[derive(Debug, Error)]
pub enum OracleError {
	/// Error that occurs during network communication with the price feed.
	#[error("Network error: {0}")]
	Network(String),
	/// The feed responded but the payload could not be interpreted.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	/// Error that occurs when configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for gas price oracle implementations.
#[async_trait]
pub trait GasOracleInterface: Send + Sync {
	/// Returns the configuration schema for this oracle implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Fetches the current recommended gas price.
	///
	/// Called once per poll cycle; results must not be cached across polls.
	async fn recommended_gas_price(&self) -> Result<GasPrice, OracleError>;
}

/// Type alias for gas oracle factory functions.
pub type GasOracleFactory = fn(&toml::Value) -> Result<Box<dyn GasOracleInterface>, OracleError>;

/// Registry trait for gas oracle implementations.
pub trait GasOracleRegistry: ImplementationRegistry<Factory = GasOracleFactory> {}

/// Get all registered gas oracle implementations.
pub fn get_all_implementations() -> Vec<(&'static str, GasOracleFactory)> {
	use implementations::{fixed, station};

	vec![
		(station::Registry::NAME, station::Registry::factory()),
		(fixed::Registry::NAME, fixed::Registry::factory()),
	]
}

/// Service that manages gas price lookups.
///
/// Wraps the configured oracle implementation behind a concrete type.
pub struct GasOracleService {
	/// The underlying oracle implementation.
	implementation: Box<dyn GasOracleInterface>,
}

impl GasOracleService {
	/// Creates a new GasOracleService with the specified implementation.
	pub fn new(implementation: Box<dyn GasOracleInterface>) -> Self {
		Self { implementation }
	}

	/// Fetches the current recommended gas price.
	pub async fn recommended_gas_price(&self) -> Result<GasPrice, OracleError> {
		self.implementation.recommended_gas_price().await
	}
}
