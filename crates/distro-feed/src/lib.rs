//! Recipient feed module for the distribution service.
//!
//! The feed is the external work queue: a paginated source of pending
//! distribution recipients, plus the commitment endpoint that marks entries
//! done once their batch transaction has been submitted. Committed entries
//! are never returned from later fetches.

use async_trait::async_trait;
use distro_types::{CommittedTransfer, ConfigSchema, FeedPage, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
}

/// Errors that can occur during feed operations.
#[derive(Debug, Error)]
pub enum FeedError {
	/// Error that occurs during network communication with the feed.
	#[error("Network error: {0}")]
	Network(String),
	/// The feed responded but the payload could not be parsed into the
	/// expected shape.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	/// Error that occurs when configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for recipient feed implementations.
#[async_trait]
pub trait FeedInterface: Send + Sync {
	/// Returns the configuration schema for this feed implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Fetches the next page of pending entries.
	///
	/// The page may be empty. An empty page with `has_more == false` means
	/// no more work exists, ever; an empty page with `has_more == true`
	/// means the caller should try again later.
	async fn fetch_next_batch(&self, page_size: usize) -> Result<FeedPage, FeedError>;

	/// Records completed transfers so the feed marks their entries done.
	///
	/// Must be called only after the paying transaction was accepted by the
	/// node. If this call fails, the transaction is already on chain and
	/// the entries will be re-served: a known at-least-once window.
	async fn commit_batch(&self, transfers: &[CommittedTransfer]) -> Result<(), FeedError>;
}

/// Type alias for feed factory functions.
pub type FeedFactory = fn(&toml::Value) -> Result<Box<dyn FeedInterface>, FeedError>;

/// Registry trait for feed implementations.
pub trait FeedRegistry: ImplementationRegistry<Factory = FeedFactory> {}

/// Get all registered feed implementations.
pub fn get_all_implementations() -> Vec<(&'static str, FeedFactory)> {
	use implementations::http;

	vec![(http::Registry::NAME, http::Registry::factory())]
}

/// Service that manages recipient feed access.
///
/// Wraps the configured feed implementation behind a concrete type.
pub struct FeedService {
	/// The underlying feed implementation.
	implementation: Box<dyn FeedInterface>,
}

impl FeedService {
	/// Creates a new FeedService with the specified implementation.
	pub fn new(implementation: Box<dyn FeedInterface>) -> Self {
		Self { implementation }
	}

	/// Fetches the next page of pending entries.
	pub async fn fetch_next_batch(&self, page_size: usize) -> Result<FeedPage, FeedError> {
		self.implementation.fetch_next_batch(page_size).await
	}

	/// Records completed transfers against the feed.
	pub async fn commit_batch(&self, transfers: &[CommittedTransfer]) -> Result<(), FeedError> {
		self.implementation.commit_batch(transfers).await
	}
}
