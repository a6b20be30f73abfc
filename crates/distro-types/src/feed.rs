//! Recipient feed wire types.
//!
//! These types mirror the payloads exchanged with the external recipient
//! feed: pending entries fetched from it and the commit records posted back
//! once a batch transaction has been submitted.

use serde::{Deserialize, Serialize};

/// A pending recipient entry as returned by the feed.
///
/// The `token` field is the feed's opaque identifier for the entry and is
/// echoed back unchanged when the entry is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
	/// Recipient address as an unvalidated string.
	pub address: String,
	/// Opaque entry identifier assigned by the feed.
	pub token: String,
}

/// One page of pending entries from the feed.
///
/// `has_more` reports whether the feed holds further pending entries beyond
/// this page. An empty page with `has_more == false` is the terminal signal:
/// no more work exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPage {
	/// Entries in this page, possibly empty.
	pub entries: Vec<RawEntry>,
	/// Whether the feed reports additional pending entries.
	pub has_more: bool,
}

/// A completed transfer record posted back to the feed.
///
/// Associates a feed entry with the transaction that paid it so the feed
/// marks the entry done and stops returning it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedTransfer {
	/// The feed's opaque entry identifier.
	pub token: String,
	/// Hash of the submitted transaction, 0x-prefixed.
	pub txid: String,
}
