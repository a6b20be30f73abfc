//! Alloy-based EVM delivery implementation.
//!
//! Submits distribution transactions over HTTP JSON-RPC using the Alloy
//! provider stack. The provider is built with a wallet filler around the
//! account's private key, so submission signs locally and sends a raw
//! transaction.

use crate::{DeliveryError, DeliveryFactory, DeliveryInterface, DeliveryRegistry};
use alloy_network::EthereumWallet;
use alloy_primitives::TxKind;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;
use async_trait::async_trait;
use distro_types::{
	truncate_id, ConfigSchema, NetworkConfig, Schema, SecretString, Transaction, TransactionHash,
	ValidationError,
};
use std::sync::Arc;

/// Delivery implementation backed by an Alloy HTTP provider.
pub struct AlloyDelivery {
	/// Provider with wallet and recommended fillers attached.
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
	/// Chain ID transactions are bound to.
	chain_id: u64,
}

impl AlloyDelivery {
	/// Creates a new AlloyDelivery for the configured network.
	///
	/// The signing key is bound to the network's chain ID; transactions for
	/// any other chain ID are rejected at submission.
	pub fn new(network: &NetworkConfig, private_key: &SecretString) -> Result<Self, DeliveryError> {
		let url = network
			.rpc_url
			.parse()
			.map_err(|e| DeliveryError::Configuration(format!("Invalid RPC URL: {}", e)))?;

		let signer = private_key
			.expose_secret()
			.parse::<PrivateKeySigner>()
			.map_err(|e| DeliveryError::Configuration(format!("Invalid signing key: {}", e)))?
			.with_chain_id(Some(network.chain_id));
		let wallet = EthereumWallet::from(signer);

		let provider = ProviderBuilder::new()
			.with_recommended_fillers()
			.wallet(wallet)
			.on_http(url);

		Ok(Self {
			provider: Arc::new(provider) as Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
			chain_id: network.chain_id,
		})
	}

	/// Converts the service transaction into an RPC transaction request.
	fn to_request(&self, tx: &Transaction) -> TransactionRequest {
		TransactionRequest {
			from: Some(tx.from),
			to: Some(TxKind::Call(tx.to)),
			input: TransactionInput::new(tx.data.clone().into()),
			value: Some(tx.value),
			gas: tx.gas_limit,
			gas_price: tx.gas_price,
			chain_id: Some(tx.chain_id),
			..Default::default()
		}
	}

	fn check_chain(&self, tx: &Transaction) -> Result<(), DeliveryError> {
		if tx.chain_id != self.chain_id {
			return Err(DeliveryError::Network(format!(
				"Transaction bound to chain {}, provider configured for chain {}",
				tx.chain_id, self.chain_id
			)));
		}
		Ok(())
	}
}

/// Configuration schema for the Alloy delivery implementation.
///
/// The implementation takes everything it needs from the `[network]`
/// section and the account key; its own section carries no fields.
pub struct AlloyDeliverySchema;

impl ConfigSchema for AlloyDeliverySchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![], vec![]).validate(config)
	}
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AlloyDeliverySchema)
	}

	async fn estimate_gas(&self, tx: &Transaction) -> Result<u64, DeliveryError> {
		self.check_chain(tx)?;
		let request = self.to_request(tx);
		self.provider
			.estimate_gas(&request)
			.await
			.map_err(|e| DeliveryError::EstimationRejected(e.to_string()))
	}

	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		self.check_chain(&tx)?;
		let request = self.to_request(&tx);

		let pending_tx = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| DeliveryError::SubmissionRejected(e.to_string()))?;

		let tx_hash = *pending_tx.tx_hash();
		tracing::info!(
			tx_hash = %truncate_id(&hex::encode(tx_hash.0)),
			chain_id = self.chain_id,
			"Submitted transaction"
		);

		Ok(TransactionHash(tx_hash.0.to_vec()))
	}
}

/// Registry for the Alloy delivery implementation.
pub struct Registry;

impl distro_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "alloy";
	type Factory = DeliveryFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value,
		 network: &NetworkConfig,
		 private_key: &SecretString|
		 -> Result<Box<dyn DeliveryInterface>, DeliveryError> {
			AlloyDeliverySchema
				.validate(config)
				.map_err(|e| DeliveryError::Configuration(e.to_string()))?;
			Ok(Box::new(AlloyDelivery::new(network, private_key)?))
		}
	}
}

impl DeliveryRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use distro_types::ImplementationRegistry;

	const KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

	fn network() -> NetworkConfig {
		NetworkConfig {
			rpc_url: "http://localhost:8545".to_string(),
			chain_id: 1,
			contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
				.parse()
				.unwrap(),
		}
	}

	#[test]
	fn non_table_config_is_a_configuration_error() {
		let config = toml::Value::Integer(1);
		let err =
			Registry::factory()(&config, &network(), &SecretString::from(KEY)).unwrap_err();
		assert!(matches!(err, DeliveryError::Configuration(_)));
	}

	#[test]
	fn invalid_signing_key_is_a_configuration_error() {
		let config: toml::Value = "".parse().unwrap();
		let key = SecretString::from("0xnot-a-key");
		let err = Registry::factory()(&config, &network(), &key).unwrap_err();
		assert!(matches!(err, DeliveryError::Configuration(_)));
	}
}
