//! Batch formation types and invariants.
//!
//! A batch is a bounded group of recipients paid by a single on-chain
//! transaction. Batches are formed from raw feed entries and uphold their
//! invariants at construction: non-empty, bounded by the configured batch
//! size, and every address syntactically valid.

use crate::{RawEntry, TransactionHash};
use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Errors that can occur when forming a batch from feed entries.
#[derive(Debug, Error)]
pub enum BatchError {
	/// A batch must contain at least one recipient.
	#[error("Batch is empty")]
	Empty,
	/// The feed returned more entries than the configured batch size.
	#[error("Batch of {got} entries exceeds maximum size {max}")]
	TooLarge { got: usize, max: usize },
	/// An entry address failed to parse as a chain address.
	#[error("Invalid recipient address: {0}")]
	InvalidAddress(String),
}

/// One validated recipient within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
	/// Validated recipient address.
	pub address: Address,
	/// Amount to transfer, in token base units.
	pub amount: U256,
	/// The feed's opaque identifier for the originating entry.
	pub entry_id: String,
}

/// An ordered, validated group of recipients paid in one transaction.
///
/// Consumed exactly once by the distribution engine; a batch whose
/// submission fails is discarded and its entries are re-fetched from the
/// feed on a later poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
	recipients: Vec<Recipient>,
}

impl Batch {
	/// Forms a batch from raw feed entries, applying a flat per-recipient
	/// amount.
	///
	/// Fails if the page is empty, exceeds `max_size`, or contains an entry
	/// whose address does not parse. A single malformed address rejects the
	/// whole page; nothing from it is submitted.
	pub fn from_entries(
		entries: &[RawEntry],
		amount: U256,
		max_size: usize,
	) -> Result<Self, BatchError> {
		if entries.is_empty() {
			return Err(BatchError::Empty);
		}
		if entries.len() > max_size {
			return Err(BatchError::TooLarge {
				got: entries.len(),
				max: max_size,
			});
		}

		let mut recipients = Vec::with_capacity(entries.len());
		for entry in entries {
			let address = entry
				.address
				.parse::<Address>()
				.map_err(|_| BatchError::InvalidAddress(entry.address.clone()))?;
			recipients.push(Recipient {
				address,
				amount,
				entry_id: entry.token.clone(),
			});
		}

		Ok(Self { recipients })
	}

	/// The validated recipients, in feed order.
	pub fn recipients(&self) -> &[Recipient] {
		&self.recipients
	}

	/// Number of recipients in the batch.
	pub fn len(&self) -> usize {
		self.recipients.len()
	}

	/// Whether the batch is empty. Always false for a constructed batch.
	pub fn is_empty(&self) -> bool {
		self.recipients.is_empty()
	}

	/// Recipient addresses in feed order, as contract call arguments.
	pub fn addresses(&self) -> Vec<Address> {
		self.recipients.iter().map(|r| r.address).collect()
	}

	/// Transfer amounts in feed order, as contract call arguments.
	pub fn amounts(&self) -> Vec<U256> {
		self.recipients.iter().map(|r| r.amount).collect()
	}
}

/// Outcome of a successfully submitted batch transaction.
///
/// "Submitted" is the success criterion: the node accepted the transaction
/// and returned its hash. The result owns the batch until its entries are
/// committed back to the feed, after which it is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
	/// Hash of the submitted transaction.
	pub hash: TransactionHash,
	/// The batch the transaction pays out.
	pub batch: Batch,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(address: &str, token: &str) -> RawEntry {
		RawEntry {
			address: address.to_string(),
			token: token.to_string(),
		}
	}

	const ADDR_A: &str = "0x6E6Bda8B1ec708Bd4Ce4f000B464557657988806";
	const ADDR_B: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

	#[test]
	fn forms_batch_with_flat_amount() {
		let entries = vec![entry(ADDR_A, "e1"), entry(ADDR_B, "e2")];
		let batch = Batch::from_entries(&entries, U256::from(100u64), 40).unwrap();

		assert_eq!(batch.len(), 2);
		assert_eq!(batch.amounts(), vec![U256::from(100u64); 2]);
		assert_eq!(batch.recipients()[0].entry_id, "e1");
		assert_eq!(batch.addresses()[1], ADDR_B.parse::<Address>().unwrap());
	}

	#[test]
	fn rejects_empty_page() {
		let err = Batch::from_entries(&[], U256::from(1u64), 40).unwrap_err();
		assert!(matches!(err, BatchError::Empty));
	}

	#[test]
	fn rejects_oversized_page() {
		let entries = vec![entry(ADDR_A, "e1"), entry(ADDR_B, "e2")];
		let err = Batch::from_entries(&entries, U256::from(1u64), 1).unwrap_err();
		assert!(matches!(err, BatchError::TooLarge { got: 2, max: 1 }));
	}

	#[test]
	fn rejects_malformed_address() {
		let entries = vec![entry(ADDR_A, "e1"), entry("not-an-address", "e2")];
		let err = Batch::from_entries(&entries, U256::from(1u64), 40).unwrap_err();
		assert!(matches!(err, BatchError::InvalidAddress(a) if a == "not-an-address"));
	}
}
