//! Account management module for the distribution service.
//!
//! This module provides the Signer collaborator: an abstraction over the
//! key material that authorizes distribution transactions. The distributor
//! core only ever sees the account's address and a handle to its signing
//! key; how the key was acquired (raw key, keystore, hardware device) is an
//! implementation concern.

use async_trait::async_trait;
use distro_types::{Address, ConfigSchema, ImplementationRegistry, SecretString};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when interacting with the account implementation.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// Trait defining the interface for account implementations.
///
/// Implementations provide the signing account's address and expose the
/// private key for the delivery layer, which constructs its own wallet from
/// it for transaction signing.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Returns the configuration schema for this account implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Retrieves the address associated with this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Returns the private key as a SecretString with 0x prefix.
	///
	/// Used by delivery implementations for transaction signing.
	fn private_key(&self) -> SecretString;
}

/// Type alias for account factory functions.
pub type AccountFactory = fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError>;

/// Registry trait for account implementations.
pub trait AccountRegistry: ImplementationRegistry<Factory = AccountFactory> {}

/// Get all registered account implementations.
///
/// Returns a vector of (name, factory) tuples for all available account
/// implementations, used to build the factory map at startup.
pub fn get_all_implementations() -> Vec<(&'static str, AccountFactory)> {
	use implementations::local;

	vec![(local::Registry::NAME, local::Registry::factory())]
}

/// Service that manages account operations.
///
/// Wraps the configured account implementation behind a concrete type the
/// rest of the system can hold.
pub struct AccountService {
	/// The underlying account implementation.
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new AccountService with the specified implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Retrieves the address of the managed account.
	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Returns the private key for use by the delivery layer.
	pub fn private_key(&self) -> SecretString {
		self.implementation.private_key()
	}
}
