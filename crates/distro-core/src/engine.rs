//! Distribution engine: one batch in, one transaction out.
//!
//! The engine encodes the batch into a `distributeTokens` contract call,
//! asks the delivery layer for a gas estimate, and submits the transaction
//! with the gas price supplied by the scheduler. It returns as soon as the
//! node accepts the transaction; confirmation is not awaited.

use alloy_primitives::U256;
use alloy_sol_types::{sol, SolCall};
use distro_delivery::{DeliveryError, DeliveryService};
use distro_types::{Address, Batch, GasPrice, Transaction, TransactionResult};
use std::sync::Arc;

sol! {
	/// Batch transfer entry point of the distribution contract.
	function distributeTokens(
		address tokenOwner,
		address[] calldata recipients,
		uint256[] calldata values
	) external;
}

/// Builds and submits one transaction per batch.
pub struct DistributionEngine {
	/// Delivery service used for estimation and submission.
	delivery: Arc<DeliveryService>,
	/// The signing account submitting the transactions.
	from: Address,
	/// Token holder whose balance funds the distribution; first argument
	/// of the contract call.
	token_holder: Address,
	/// Address of the distribution contract.
	contract: Address,
	/// Chain ID transactions are bound to.
	chain_id: u64,
}

impl DistributionEngine {
	/// Creates a distribution engine for the given contract and accounts.
	pub fn new(
		delivery: Arc<DeliveryService>,
		from: Address,
		token_holder: Address,
		contract: Address,
		chain_id: u64,
	) -> Self {
		Self {
			delivery,
			from,
			token_holder,
			contract,
			chain_id,
		}
	}

	/// Submits one batch as a `distributeTokens` transaction.
	///
	/// Estimates gas first, then submits with the estimate and the caller's
	/// gas price. Any failure leaves the batch uncommitted; its entries are
	/// re-served by the feed on a later poll.
	pub async fn submit(
		&self,
		batch: Batch,
		gas_price: GasPrice,
	) -> Result<TransactionResult, DeliveryError> {
		let call = distributeTokensCall {
			tokenOwner: self.token_holder,
			recipients: batch.addresses(),
			values: batch.amounts(),
		};

		let mut tx = Transaction {
			from: self.from,
			to: self.contract,
			data: call.abi_encode(),
			value: U256::ZERO,
			chain_id: self.chain_id,
			gas_limit: None,
			gas_price: None,
		};

		let gas_limit = self.delivery.estimate_gas(&tx).await?;
		tracing::info!(gas_limit, recipients = batch.len(), "Estimated gas for batch");

		tx.gas_limit = Some(gas_limit);
		tx.gas_price = Some(gas_price.wei);

		let hash = self.delivery.submit(tx).await?;
		Ok(TransactionResult { hash, batch })
	}
}
