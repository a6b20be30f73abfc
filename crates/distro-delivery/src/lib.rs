//! Transaction delivery module for the distribution service.
//!
//! This module is the ChainClient collaborator: it estimates gas for a
//! batch distribution call and submits the signed transaction to the
//! network. Estimation failures and submission failures are reported as
//! distinct error variants so the scheduler can log them apart; both leave
//! the batch uncommitted and eligible for retry on a later poll.

use async_trait::async_trait;
use distro_types::{ConfigSchema, ImplementationRegistry, NetworkConfig, SecretString, Transaction, TransactionHash};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// The node rejected the gas estimation call.
	#[error("Gas estimation rejected: {0}")]
	EstimationRejected(String),
	/// The node rejected the transaction submission.
	#[error("Submission rejected: {0}")]
	SubmissionRejected(String),
	/// Error that occurs when configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for transaction delivery providers.
///
/// A provider signs with the key handed to it at construction. "Submitted"
/// is the success criterion for `submit`: the node accepted the transaction
/// and returned its hash. The delivery layer does not wait for finality.
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Returns the configuration schema for this delivery implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Estimates the gas limit for the given call.
	async fn estimate_gas(&self, tx: &Transaction) -> Result<u64, DeliveryError>;

	/// Signs and submits the transaction, returning its hash.
	///
	/// The transaction must carry a gas limit and gas price; the caller
	/// sets both from the estimate and the oracle before submitting.
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError>;
}

impl std::fmt::Debug for dyn DeliveryInterface {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DeliveryInterface").finish_non_exhaustive()
	}
}

/// Type alias for delivery factory functions.
///
/// Delivery factories additionally receive the network configuration and
/// the signing key from the account service.
pub type DeliveryFactory = fn(
	&toml::Value,
	&NetworkConfig,
	&SecretString,
) -> Result<Box<dyn DeliveryInterface>, DeliveryError>;

/// Registry trait for delivery implementations.
pub trait DeliveryRegistry: ImplementationRegistry<Factory = DeliveryFactory> {}

/// Get all registered delivery implementations.
pub fn get_all_implementations() -> Vec<(&'static str, DeliveryFactory)> {
	use implementations::evm;

	vec![(evm::alloy::Registry::NAME, evm::alloy::Registry::factory())]
}

/// Service that manages transaction delivery.
///
/// Wraps the configured delivery implementation behind a concrete type.
pub struct DeliveryService {
	/// The underlying delivery implementation.
	implementation: Box<dyn DeliveryInterface>,
}

impl DeliveryService {
	/// Creates a new DeliveryService with the specified implementation.
	pub fn new(implementation: Box<dyn DeliveryInterface>) -> Self {
		Self { implementation }
	}

	/// Estimates the gas limit for the given call.
	pub async fn estimate_gas(&self, tx: &Transaction) -> Result<u64, DeliveryError> {
		self.implementation.estimate_gas(tx).await
	}

	/// Signs and submits the transaction, returning its hash.
	pub async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		self.implementation.submit(tx).await
	}
}
