//! Hand-rolled collaborator mocks shared by the core tests.
//!
//! Each mock implements the corresponding service interface and keeps its
//! call records behind `Arc`s, so tests can clone a handle before boxing
//! the mock into a service and assert on it afterwards.

use async_trait::async_trait;
use distro_delivery::{DeliveryError, DeliveryInterface};
use distro_feed::{FeedError, FeedInterface};
use distro_gas::{GasOracleInterface, OracleError};
use distro_types::{
	Address, CommittedTransfer, ConfigSchema, FeedPage, GasPrice, RawEntry, Transaction,
	TransactionHash, ValidationError,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) fn addr(byte: u8) -> Address {
	Address::repeat_byte(byte)
}

/// A feed page of `n` distinct, valid recipients.
pub(crate) fn page(n: usize, has_more: bool) -> FeedPage {
	let entries = (0..n)
		.map(|i| RawEntry {
			address: format!("0x{:040x}", i + 1),
			token: format!("entry-{}", i),
		})
		.collect();
	FeedPage { entries, has_more }
}

/// Schema that accepts any section; mocks have no configuration.
struct AnySchema;

impl ConfigSchema for AnySchema {
	fn validate(&self, _config: &toml::Value) -> Result<(), ValidationError> {
		Ok(())
	}
}

/// Gas oracle mock reporting one fixed price, or failing outright.
#[derive(Clone)]
pub(crate) struct MockOracle {
	price_gwei: f64,
	fail: bool,
	pub calls: Arc<AtomicUsize>,
}

impl MockOracle {
	pub fn reporting(price_gwei: f64) -> Self {
		Self {
			price_gwei,
			fail: false,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn unreachable() -> Self {
		Self {
			price_gwei: 0.0,
			fail: true,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}
}

#[async_trait]
impl GasOracleInterface for MockOracle {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AnySchema)
	}

	async fn recommended_gas_price(&self) -> Result<GasPrice, OracleError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if self.fail {
			Err(OracleError::Network("feed unreachable".to_string()))
		} else {
			Ok(GasPrice::from_gwei(self.price_gwei))
		}
	}
}

/// Feed mock serving a scripted sequence of pages.
///
/// Once the script is exhausted it serves the terminal page, so tests do
/// not hang a scheduler loop.
#[derive(Clone)]
pub(crate) struct MockFeed {
	pages: Arc<Mutex<VecDeque<Result<FeedPage, FeedError>>>>,
	fail_commit: bool,
	pub fetches: Arc<AtomicUsize>,
	pub commits: Arc<Mutex<Vec<Vec<CommittedTransfer>>>>,
}

impl MockFeed {
	pub fn with_pages(pages: Vec<Result<FeedPage, FeedError>>) -> Self {
		Self {
			pages: Arc::new(Mutex::new(pages.into())),
			fail_commit: false,
			fetches: Arc::new(AtomicUsize::new(0)),
			commits: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn failing_commit(mut self) -> Self {
		self.fail_commit = true;
		self
	}
}

#[async_trait]
impl FeedInterface for MockFeed {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AnySchema)
	}

	async fn fetch_next_batch(&self, _page_size: usize) -> Result<FeedPage, FeedError> {
		self.fetches.fetch_add(1, Ordering::SeqCst);
		self.pages.lock().unwrap().pop_front().unwrap_or(Ok(FeedPage {
			entries: Vec::new(),
			has_more: false,
		}))
	}

	async fn commit_batch(&self, transfers: &[CommittedTransfer]) -> Result<(), FeedError> {
		self.commits.lock().unwrap().push(transfers.to_vec());
		if self.fail_commit {
			Err(FeedError::Network("register endpoint unreachable".to_string()))
		} else {
			Ok(())
		}
	}
}

/// Delivery mock recording submitted transactions.
#[derive(Clone)]
pub(crate) struct MockDelivery {
	estimate: u64,
	fail_estimation: bool,
	fail_submission: bool,
	pub estimates: Arc<AtomicUsize>,
	pub submitted: Arc<Mutex<Vec<Transaction>>>,
}

impl MockDelivery {
	pub fn with_estimate(estimate: u64) -> Self {
		Self {
			estimate,
			fail_estimation: false,
			fail_submission: false,
			estimates: Arc::new(AtomicUsize::new(0)),
			submitted: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn failing_estimation() -> Self {
		let mut mock = Self::with_estimate(0);
		mock.fail_estimation = true;
		mock
	}

	pub fn failing_submission() -> Self {
		let mut mock = Self::with_estimate(21_000);
		mock.fail_submission = true;
		mock
	}

	/// The hash every successful submission reports.
	pub fn tx_hash() -> TransactionHash {
		TransactionHash(vec![0xab; 32])
	}
}

#[async_trait]
impl DeliveryInterface for MockDelivery {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AnySchema)
	}

	async fn estimate_gas(&self, _tx: &Transaction) -> Result<u64, DeliveryError> {
		self.estimates.fetch_add(1, Ordering::SeqCst);
		if self.fail_estimation {
			Err(DeliveryError::EstimationRejected(
				"node rejected estimation".to_string(),
			))
		} else {
			Ok(self.estimate)
		}
	}

	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		if self.fail_submission {
			return Err(DeliveryError::SubmissionRejected(
				"node rejected submission".to_string(),
			));
		}
		self.submitted.lock().unwrap().push(tx);
		Ok(Self::tx_hash())
	}
}
