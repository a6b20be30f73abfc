//! Chain-facing types for the distribution service.
//!
//! This module defines the transaction shape handed to the delivery layer
//! and the network configuration shared between the config crate and the
//! delivery implementations.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Blockchain transaction hash representation.
///
/// Stores transaction hashes as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

impl TransactionHash {
	/// Returns the hash as a 0x-prefixed lowercase hex string.
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(&self.0))
	}
}

/// A contract call ready for gas estimation and submission.
///
/// The delivery layer fills in nothing; gas limit and gas price are set by
/// the caller before submission. A transaction with `gas_limit: None` can
/// only be estimated, not submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// The sending account (must match the configured signer).
	pub from: Address,
	/// The target contract address.
	pub to: Address,
	/// ABI-encoded calldata.
	pub data: Vec<u8>,
	/// Native token value attached to the call.
	pub value: U256,
	/// Chain ID the transaction is bound to.
	pub chain_id: u64,
	/// Gas limit, set from an estimate before submission.
	pub gas_limit: Option<u64>,
	/// Legacy gas price in wei, set from the oracle before submission.
	pub gas_price: Option<u128>,
}

/// Network connection and contract configuration.
///
/// Deserialized from the `[network]` section of the configuration file and
/// consumed by the delivery layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
	/// HTTP RPC endpoint for the target network.
	pub rpc_url: String,
	/// Chain ID of the target network.
	pub chain_id: u64,
	/// Address of the deployed distribution contract.
	pub contract_address: Address,
}
