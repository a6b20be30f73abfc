//! Builder pattern for constructing the distribution scheduler.
//!
//! Composes a BatchScheduler from configuration using factory functions.
//! Supports pluggable account, gas oracle, feed and delivery
//! implementations; each section of the configuration names its primary
//! implementation and carries the raw TOML the factory validates.

use crate::engine::DistributionEngine;
use crate::scheduler::{BatchScheduler, SchedulerSettings};
use distro_account::{AccountError, AccountInterface, AccountService};
use distro_config::Config;
use distro_delivery::{DeliveryError, DeliveryInterface, DeliveryService};
use distro_feed::{FeedError, FeedInterface, FeedService};
use distro_gas::{GasOracleInterface, GasOracleService, OracleError};
use distro_types::{GasPrice, NetworkConfig, SecretString};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during scheduler construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Container for all factory functions needed to build a BatchScheduler.
///
/// Each map is keyed by implementation name; the builder picks the entry
/// the configuration names as primary for that section.
pub struct DistributorFactories<AF, GF, FF, DF> {
	pub account_factories: HashMap<String, AF>,
	pub gas_factories: HashMap<String, GF>,
	pub feed_factories: HashMap<String, FF>,
	pub delivery_factories: HashMap<String, DF>,
}

/// Builder for constructing a BatchScheduler with pluggable implementations.
pub struct DistributorBuilder {
	config: Config,
}

impl DistributorBuilder {
	/// Creates a new DistributorBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the BatchScheduler using factories for each component type.
	pub async fn build<AF, GF, FF, DF>(
		self,
		factories: DistributorFactories<AF, GF, FF, DF>,
	) -> Result<BatchScheduler, BuilderError>
	where
		AF: Fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError>,
		GF: Fn(&toml::Value) -> Result<Box<dyn GasOracleInterface>, OracleError>,
		FF: Fn(&toml::Value) -> Result<Box<dyn FeedInterface>, FeedError>,
		DF: Fn(
			&toml::Value,
			&NetworkConfig,
			&SecretString,
		) -> Result<Box<dyn DeliveryInterface>, DeliveryError>,
	{
		let account_config = primary_config(
			"account",
			&self.config.account.primary,
			&self.config.account.implementations,
		)?;
		let account_factory = factories
			.account_factories
			.get(&self.config.account.primary)
			.ok_or_else(|| missing("account", &self.config.account.primary))?;
		let account = Arc::new(AccountService::new(
			account_factory(account_config)
				.map_err(|e| failed("account", &self.config.account.primary, e))?,
		));
		tracing::info!(component = "account", implementation = %self.config.account.primary, "Loaded");

		let gas_config = primary_config(
			"gas",
			&self.config.gas.primary,
			&self.config.gas.implementations,
		)?;
		let gas_factory = factories
			.gas_factories
			.get(&self.config.gas.primary)
			.ok_or_else(|| missing("gas", &self.config.gas.primary))?;
		let oracle = Arc::new(GasOracleService::new(
			gas_factory(gas_config).map_err(|e| failed("gas", &self.config.gas.primary, e))?,
		));
		tracing::info!(component = "gas", implementation = %self.config.gas.primary, "Loaded");

		let feed_config = primary_config(
			"feed",
			&self.config.feed.primary,
			&self.config.feed.implementations,
		)?;
		let feed_factory = factories
			.feed_factories
			.get(&self.config.feed.primary)
			.ok_or_else(|| missing("feed", &self.config.feed.primary))?;
		let feed = Arc::new(FeedService::new(
			feed_factory(feed_config).map_err(|e| failed("feed", &self.config.feed.primary, e))?,
		));
		tracing::info!(component = "feed", implementation = %self.config.feed.primary, "Loaded");

		let sender = account
			.get_address()
			.await
			.map_err(|e| BuilderError::Config(format!("Failed to resolve account address: {}", e)))?;
		tracing::info!(address = %sender, "Using account");

		let delivery_config = primary_config(
			"delivery",
			&self.config.delivery.primary,
			&self.config.delivery.implementations,
		)?;
		let delivery_factory = factories
			.delivery_factories
			.get(&self.config.delivery.primary)
			.ok_or_else(|| missing("delivery", &self.config.delivery.primary))?;
		let private_key = account.private_key();
		let delivery = Arc::new(DeliveryService::new(
			delivery_factory(delivery_config, &self.config.network, &private_key)
				.map_err(|e| failed("delivery", &self.config.delivery.primary, e))?,
		));
		tracing::info!(component = "delivery", implementation = %self.config.delivery.primary, "Loaded");

		let engine = DistributionEngine::new(
			delivery,
			sender,
			self.config.distributor.sender_address,
			self.config.network.contract_address,
			self.config.network.chain_id,
		);

		let amount = self
			.config
			.distributor
			.amount()
			.map_err(|e| BuilderError::Config(e.to_string()))?;
		let settings = SchedulerSettings {
			batch_size: self.config.distributor.batch_size,
			max_gas_price: GasPrice::from_gwei(self.config.distributor.max_gas_price_gwei),
			amount_per_recipient: amount,
			poll_interval: self.config.distributor.poll_interval(),
		};

		Ok(BatchScheduler::new(engine, oracle, feed, settings))
	}
}

/// Looks up the raw TOML for a section's primary implementation.
fn primary_config<'a>(
	component: &str,
	primary: &str,
	implementations: &'a HashMap<String, toml::Value>,
) -> Result<&'a toml::Value, BuilderError> {
	implementations.get(primary).ok_or_else(|| {
		BuilderError::Config(format!(
			"{} implementation '{}' has no configuration",
			component, primary
		))
	})
}

fn missing(component: &str, primary: &str) -> BuilderError {
	BuilderError::MissingComponent(format!(
		"No {} factory registered for '{}'",
		component, primary
	))
}

fn failed(component: &str, primary: &str, error: impl std::fmt::Display) -> BuilderError {
	BuilderError::Config(format!(
		"Failed to create {} implementation '{}': {}",
		component, primary, error
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::{MockDelivery, MockFeed, MockOracle};
	use async_trait::async_trait;
	use distro_types::{Address, ConfigSchema, ValidationError};

	const CONFIG: &str = r#"
[distributor]
sender_address = "0x6E6Bda8B1ec708Bd4Ce4f000B464557657988806"
max_gas_price_gwei = 50.0
amount_per_recipient = "1000000000000000000"

[network]
rpc_url = "http://localhost:8545"
chain_id = 1
contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"

[account]
primary = "test"
[account.implementations.test]

[gas]
primary = "test"
[gas.implementations.test]

[feed]
primary = "test"
[feed.implementations.test]

[delivery]
primary = "test"
[delivery.implementations.test]
"#;

	struct TestAccount;

	#[async_trait]
	impl AccountInterface for TestAccount {
		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			struct Any;
			impl ConfigSchema for Any {
				fn validate(&self, _config: &toml::Value) -> Result<(), ValidationError> {
					Ok(())
				}
			}
			Box::new(Any)
		}

		async fn address(&self) -> Result<Address, AccountError> {
			Ok(Address::repeat_byte(0xAA))
		}

		fn private_key(&self) -> SecretString {
			SecretString::from("0x01")
		}
	}

	fn factories() -> DistributorFactories<
		impl Fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError>,
		impl Fn(&toml::Value) -> Result<Box<dyn GasOracleInterface>, OracleError>,
		impl Fn(&toml::Value) -> Result<Box<dyn FeedInterface>, FeedError>,
		impl Fn(
			&toml::Value,
			&NetworkConfig,
			&SecretString,
		) -> Result<Box<dyn DeliveryInterface>, DeliveryError>,
	> {
		let mut account_factories = HashMap::new();
		account_factories.insert("test".to_string(), |_: &toml::Value| {
			Ok(Box::new(TestAccount) as Box<dyn AccountInterface>)
		});
		let mut gas_factories = HashMap::new();
		gas_factories.insert("test".to_string(), |_: &toml::Value| {
			Ok(Box::new(MockOracle::reporting(30.0)) as Box<dyn GasOracleInterface>)
		});
		let mut feed_factories = HashMap::new();
		feed_factories.insert("test".to_string(), |_: &toml::Value| {
			Ok(Box::new(MockFeed::with_pages(vec![])) as Box<dyn FeedInterface>)
		});
		let mut delivery_factories = HashMap::new();
		delivery_factories.insert(
			"test".to_string(),
			|_: &toml::Value, _: &NetworkConfig, _: &SecretString| {
				Ok(Box::new(MockDelivery::with_estimate(21_000)) as Box<dyn DeliveryInterface>)
			},
		);
		DistributorFactories {
			account_factories,
			gas_factories,
			feed_factories,
			delivery_factories,
		}
	}

	fn config() -> Config {
		let config: Config = toml::from_str(CONFIG).unwrap();
		config.validate().unwrap();
		config
	}

	#[tokio::test]
	async fn builds_scheduler_from_config() {
		let scheduler = DistributorBuilder::new(config())
			.build(factories())
			.await
			.unwrap();

		// An exhausted feed finishes on the first tick.
		assert!(matches!(
			scheduler.tick().await,
			crate::scheduler::TickOutcome::Finished
		));
	}

	#[tokio::test]
	async fn unregistered_factory_is_a_missing_component() {
		let mut factories = factories();
		factories.gas_factories.clear();

		let err = DistributorBuilder::new(config())
			.build(factories)
			.await
			.unwrap_err();
		assert!(matches!(err, BuilderError::MissingComponent(_)));
	}
}
