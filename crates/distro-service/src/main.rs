//! Main entry point for the token distribution service.
//!
//! This binary drains a feed of pending recipients by submitting batched
//! token transfers whenever the network gas price is below the configured
//! ceiling. It uses a modular architecture with pluggable implementations
//! for the signing account, gas oracle, recipient feed and transaction
//! delivery.

use clap::Parser;
use distro_config::Config;
use distro_core::{DistributorBuilder, DistributorFactories};
use std::collections::HashMap;
use std::path::PathBuf;

/// Command-line arguments for the distribution service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Collects the registered implementations of every component crate.
fn factories() -> DistributorFactories<
	distro_account::AccountFactory,
	distro_gas::GasOracleFactory,
	distro_feed::FeedFactory,
	distro_delivery::DeliveryFactory,
> {
	fn collect<F>(implementations: Vec<(&'static str, F)>) -> HashMap<String, F> {
		implementations
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect()
	}

	DistributorFactories {
		account_factories: collect(distro_account::get_all_implementations()),
		gas_factories: collect(distro_gas::get_all_implementations()),
		feed_factories: collect(distro_feed::get_all_implementations()),
		delivery_factories: collect(distro_delivery::get_all_implementations()),
	}
}

/// Main entry point for the distribution service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the batch scheduler with all implementations
/// 5. Runs the distribution loop until the feed is drained or interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	tracing::info!("Started distributor");

	let config = Config::from_file(&args.config)?;
	tracing::info!(
		batch_size = config.distributor.batch_size,
		max_gas_price_gwei = config.distributor.max_gas_price_gwei,
		"Loaded configuration"
	);

	let scheduler = DistributorBuilder::new(config).build(factories()).await?;
	scheduler.run().await;

	tracing::info!("Stopped distributor");
	Ok(())
}
