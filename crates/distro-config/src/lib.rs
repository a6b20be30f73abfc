//! Configuration module for the distribution service.
//!
//! This module provides the structures and loading logic for the service
//! configuration. Configuration is read from a TOML file and validated at
//! startup; a missing or invalid required value is the single fatal error
//! class in the system, reported before the distribution loop starts.

use distro_types::{NetworkConfig, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing the TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, drop the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the distribution service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Distribution loop parameters.
	pub distributor: DistributorConfig,
	/// Network connection and contract configuration.
	pub network: NetworkConfig,
	/// Signing account configuration.
	pub account: AccountConfig,
	/// Gas price oracle configuration.
	pub gas: GasConfig,
	/// Recipient feed configuration.
	pub feed: FeedConfig,
	/// Transaction delivery configuration.
	pub delivery: DeliveryConfig,
}

/// Distribution loop parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DistributorConfig {
	/// Token holder address passed as the first argument of the
	/// distribution call. Not necessarily the signing account.
	pub sender_address: distro_types::Address,
	/// Maximum recipients per batch transaction.
	#[serde(default = "default_batch_size")]
	pub batch_size: usize,
	/// Gas price ceiling in gwei. Required; no batch is submitted while the
	/// recommended gas price exceeds it.
	pub max_gas_price_gwei: f64,
	/// Poll interval for the scheduler tick, in milliseconds.
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	/// Flat amount sent to every recipient, in token base units, as a
	/// decimal string.
	pub amount_per_recipient: String,
}

impl DistributorConfig {
	/// The poll interval as a [`Duration`].
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	/// Parses the per-recipient amount into a [`U256`].
	pub fn amount(&self) -> Result<U256, ConfigError> {
		U256::from_str_radix(&self.amount_per_recipient, 10).map_err(|e| {
			ConfigError::Validation(format!(
				"amount_per_recipient is not a decimal integer: {}",
				e
			))
		})
	}
}

/// Returns the default batch size.
fn default_batch_size() -> usize {
	40
}

/// Returns the default poll interval in milliseconds (30 seconds).
fn default_poll_interval_ms() -> u64 {
	30_000
}

/// Configuration for the signing account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of account implementation names to their raw configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the gas price oracle.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GasConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of oracle implementation names to their raw configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the recipient feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of feed implementation names to their raw configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for transaction delivery.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of delivery implementation names to their raw configurations.
	pub implementations: HashMap<String, toml::Value>,
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		let config: Config = toml::from_str(&content)?;
		config.validate()?;
		Ok(config)
	}

	/// Validates cross-field constraints serde cannot express.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.distributor.batch_size == 0 {
			return Err(ConfigError::Validation(
				"batch_size must be at least 1".into(),
			));
		}
		if self.distributor.poll_interval_ms == 0 {
			return Err(ConfigError::Validation(
				"poll_interval_ms must be at least 1".into(),
			));
		}
		if !(self.distributor.max_gas_price_gwei > 0.0) {
			return Err(ConfigError::Validation(
				"max_gas_price_gwei must be positive".into(),
			));
		}
		self.distributor.amount()?;

		for (section, primary, implementations) in [
			("account", &self.account.primary, &self.account.implementations),
			("gas", &self.gas.primary, &self.gas.implementations),
			("feed", &self.feed.primary, &self.feed.implementations),
			("delivery", &self.delivery.primary, &self.delivery.implementations),
		] {
			if !implementations.contains_key(primary) {
				return Err(ConfigError::Validation(format!(
					"{}.primary '{}' has no matching entry in {}.implementations",
					section, primary, section
				)));
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const VALID: &str = r#"
[distributor]
sender_address = "0x6E6Bda8B1ec708Bd4Ce4f000B464557657988806"
max_gas_price_gwei = 50.0
amount_per_recipient = "1000000000000000000"

[network]
rpc_url = "http://localhost:8545"
chain_id = 1
contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"

[account]
primary = "local"
[account.implementations.local]
private_key = "0x0000000000000000000000000000000000000000000000000000000000000001"

[gas]
primary = "station"
[gas.implementations.station]
url = "https://ethgasstation.info/json/ethgasAPI.json"

[feed]
primary = "http"
[feed.implementations.http]
api_url = "http://localhost:3000"
authorization = "secret"

[delivery]
primary = "alloy"
[delivery.implementations.alloy]
"#;

	fn write_config(content: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(content.as_bytes()).unwrap();
		file
	}

	#[test]
	fn loads_valid_config_with_defaults() {
		let file = write_config(VALID);
		let config = Config::from_file(file.path()).unwrap();

		assert_eq!(config.distributor.batch_size, 40);
		assert_eq!(config.distributor.poll_interval_ms, 30_000);
		assert_eq!(config.distributor.poll_interval(), Duration::from_secs(30));
		assert_eq!(
			config.distributor.amount().unwrap(),
			U256::from(10u64).pow(U256::from(18u64))
		);
		assert_eq!(config.network.chain_id, 1);
	}

	#[test]
	fn missing_gas_ceiling_is_fatal() {
		let content = VALID.replace("max_gas_price_gwei = 50.0\n", "");
		let file = write_config(&content);
		let err = Config::from_file(file.path()).unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn unknown_primary_is_rejected() {
		let content = VALID.replace("primary = \"station\"", "primary = \"chainlink\"");
		let file = write_config(&content);
		let err = Config::from_file(file.path()).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn non_numeric_amount_is_rejected() {
		let content = VALID.replace("\"1000000000000000000\"", "\"one token\"");
		let file = write_config(&content);
		let err = Config::from_file(file.path()).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn zero_batch_size_is_rejected() {
		let content = VALID.replace(
			"max_gas_price_gwei = 50.0",
			"max_gas_price_gwei = 50.0\nbatch_size = 0",
		);
		let file = write_config(&content);
		let err = Config::from_file(file.path()).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}
}
