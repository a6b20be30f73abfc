//! Batch scheduler: the polling loop of the distributor.
//!
//! Every tick the scheduler checks the gas price against the configured
//! ceiling, pulls the next page of pending recipients from the feed, hands
//! the batch to the distribution engine, and commits the submitted
//! transfers back to the feed. At most one tick does work at a time; a
//! tick that fires while a previous one is still in flight is a no-op.
//! The loop ends when the feed reports no entries left and none pending.

use crate::engine::DistributionEngine;
use distro_delivery::DeliveryError;
use distro_feed::{FeedError, FeedService};
use distro_gas::{GasOracleService, OracleError};
use distro_types::{Batch, BatchError, CommittedTransfer, GasPrice, TransactionHash, U256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Tunables of the polling loop, taken from the `[distributor]` section.
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
	/// Maximum recipients per transaction, also the feed page size.
	pub batch_size: usize,
	/// Ceiling above which no batch is submitted.
	pub max_gas_price: GasPrice,
	/// Flat amount transferred to each recipient, in token base units.
	pub amount_per_recipient: U256,
	/// Time between ticks.
	pub poll_interval: Duration,
}

/// What one tick of the scheduler did.
#[derive(Debug)]
pub enum TickOutcome {
	/// A previous tick is still in flight; nothing was done.
	InFlight,
	/// The oracle price exceeded the ceiling; submission deferred.
	GasAboveCeiling(GasPrice),
	/// The feed returned no entries but reported more pending.
	EmptyPage,
	/// A batch was submitted and committed.
	Dispatched {
		hash: TransactionHash,
		recipients: usize,
	},
	/// The feed is exhausted; the loop should stop.
	Finished,
	/// The attempt failed; the same work is retried on a later tick.
	Failed(String),
}

/// Any failure a single distribution attempt can hit.
///
/// All variants are handled the same way: log and retry on the next tick.
#[derive(Debug, Error)]
enum AttemptError {
	#[error("Gas oracle error: {0}")]
	Oracle(#[from] OracleError),
	#[error("Feed error: {0}")]
	Feed(#[from] FeedError),
	#[error("Batch error: {0}")]
	Batch(#[from] BatchError),
	#[error("Delivery error: {0}")]
	Delivery(#[from] DeliveryError),
}

/// Resets the in-flight flag when the tick ends, on any exit path.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::SeqCst);
	}
}

/// Drives the distribution to completion, one gas-gated batch at a time.
pub struct BatchScheduler {
	engine: DistributionEngine,
	oracle: Arc<GasOracleService>,
	feed: Arc<FeedService>,
	settings: SchedulerSettings,
	processing: AtomicBool,
}

impl std::fmt::Debug for BatchScheduler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BatchScheduler")
			.field("settings", &self.settings)
			.field("processing", &self.processing)
			.finish_non_exhaustive()
	}
}

impl BatchScheduler {
	/// Creates a scheduler over the given engine and services.
	pub fn new(
		engine: DistributionEngine,
		oracle: Arc<GasOracleService>,
		feed: Arc<FeedService>,
		settings: SchedulerSettings,
	) -> Self {
		Self {
			engine,
			oracle,
			feed,
			settings,
			processing: AtomicBool::new(false),
		}
	}

	/// Runs the polling loop until the feed is exhausted or the process
	/// receives a shutdown signal.
	pub async fn run(&self) {
		tracing::info!(
			batch_size = self.settings.batch_size,
			max_gas_price = %self.settings.max_gas_price,
			poll_interval_ms = self.settings.poll_interval.as_millis() as u64,
			"Starting distribution loop"
		);

		let mut interval = tokio::time::interval(self.settings.poll_interval);
		interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

		loop {
			tokio::select! {
				_ = interval.tick() => {
					if matches!(self.tick().await, TickOutcome::Finished) {
						break;
					}
				}
				_ = tokio::signal::ctrl_c() => {
					tracing::info!("Received shutdown signal, stopping distribution loop");
					break;
				}
			}
		}
	}

	/// Executes one tick of the loop.
	///
	/// Skips entirely if a previous tick is still in flight. Errors never
	/// escape a tick; they are logged and reported as [`TickOutcome::Failed`]
	/// so the loop retries the same work on its next tick.
	pub async fn tick(&self) -> TickOutcome {
		if self.processing.swap(true, Ordering::SeqCst) {
			tracing::debug!("Previous batch still in flight, skipping tick");
			return TickOutcome::InFlight;
		}
		let _guard = ProcessingGuard(&self.processing);

		match self.attempt().await {
			Ok(outcome) => outcome,
			Err(e) => {
				tracing::warn!(error = %e, "Distribution attempt failed, retrying next tick");
				TickOutcome::Failed(e.to_string())
			}
		}
	}

	async fn attempt(&self) -> Result<TickOutcome, AttemptError> {
		let gas_price = self.oracle.recommended_gas_price().await?;
		if gas_price > self.settings.max_gas_price {
			tracing::info!(
				current = %gas_price,
				ceiling = %self.settings.max_gas_price,
				"Gas price above ceiling, deferring batch"
			);
			return Ok(TickOutcome::GasAboveCeiling(gas_price));
		}

		let page = self.feed.fetch_next_batch(self.settings.batch_size).await?;
		if page.entries.is_empty() {
			if page.has_more {
				tracing::debug!("Feed returned an empty page with entries still pending");
				return Ok(TickOutcome::EmptyPage);
			}
			tracing::info!("No pending recipients remain, distribution complete");
			return Ok(TickOutcome::Finished);
		}

		let batch = Batch::from_entries(
			&page.entries,
			self.settings.amount_per_recipient,
			self.settings.batch_size,
		)?;
		let recipients = batch.len();

		let result = self.engine.submit(batch, gas_price).await?;
		let txid = result.hash.to_hex();
		tracing::info!(txid = %txid, recipients, "Submitted distribution batch");

		let transfers: Vec<CommittedTransfer> = result
			.batch
			.recipients()
			.iter()
			.map(|r| CommittedTransfer {
				token: r.entry_id.clone(),
				txid: txid.clone(),
			})
			.collect();

		// Commit failures after submission leave the entries pending on the
		// feed side even though the transfer is on chain; the feed may serve
		// them again.
		self.feed.commit_batch(&transfers).await?;

		Ok(TickOutcome::Dispatched {
			hash: result.hash,
			recipients,
		})
	}
}
