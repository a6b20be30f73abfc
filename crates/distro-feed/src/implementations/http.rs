//! HTTP recipient feed implementation.
//!
//! Talks to the distribution API: `GET /subscribers?page=1&pageSize=N`
//! returns pending entries and a count of entries remaining beyond the
//! page; `POST /register` records completed transfers. Both calls carry the
//! operator's credential in the `authorization` header.

use crate::{FeedError, FeedFactory, FeedInterface, FeedRegistry};
use async_trait::async_trait;
use distro_types::{
	CommittedTransfer, ConfigSchema, Field, FieldType, FeedPage, RawEntry, Schema, SecretString,
	ValidationError,
};
use serde::{Deserialize, Serialize};

/// Configuration for the HTTP feed implementation.
#[derive(Debug, Clone, Deserialize)]
struct HttpFeedConfig {
	/// Base URL of the distribution API.
	api_url: String,
	/// Credential sent in the `authorization` header.
	authorization: SecretString,
}

/// Response shape of the subscribers endpoint.
#[derive(Debug, Clone, Deserialize)]
struct SubscribersResponse {
	/// Whether the API considers the request successful.
	ok: bool,
	/// Pending entries for this page.
	#[serde(default)]
	result: Vec<RawEntry>,
	/// Count of pending entries remaining beyond this page.
	#[serde(rename = "pendingSubscribers", default)]
	pending_subscribers: u64,
}

/// Request body of the register endpoint.
#[derive(Debug, Clone, Serialize)]
struct RegisterRequest<'a> {
	txs: &'a [CommittedTransfer],
}

/// Recipient feed backed by the distribution HTTP API.
pub struct HttpFeed {
	api_url: String,
	authorization: SecretString,
	client: reqwest::Client,
}

impl HttpFeed {
	/// Creates an HTTP feed client for the given API.
	pub fn new(api_url: String, authorization: SecretString) -> Self {
		let api_url = api_url.trim_end_matches('/').to_string();
		Self {
			api_url,
			authorization,
			client: reqwest::Client::new(),
		}
	}

	/// Converts a subscribers payload into a feed page.
	fn page_from_response(response: SubscribersResponse) -> Result<FeedPage, FeedError> {
		if !response.ok {
			return Err(FeedError::InvalidResponse(
				"API reported ok = false".to_string(),
			));
		}
		Ok(FeedPage {
			entries: response.result,
			has_more: response.pending_subscribers != 0,
		})
	}
}

/// Configuration schema for the HTTP feed implementation.
pub struct HttpFeedSchema;

impl ConfigSchema for HttpFeedSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("api_url", FieldType::String).with_validator(|value| {
					let url = value.as_str().unwrap_or_default();
					if url.starts_with("http://") || url.starts_with("https://") {
						Ok(())
					} else {
						Err("api_url must be an http(s) endpoint".to_string())
					}
				}),
				Field::new("authorization", FieldType::String).with_validator(|value| {
					if value.as_str().unwrap_or_default().is_empty() {
						Err("authorization must not be empty".to_string())
					} else {
						Ok(())
					}
				}),
			],
			vec![],
		);
		schema.validate(config)
	}
}

#[async_trait]
impl FeedInterface for HttpFeed {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpFeedSchema)
	}

	async fn fetch_next_batch(&self, page_size: usize) -> Result<FeedPage, FeedError> {
		let url = format!(
			"{}/subscribers?page=1&pageSize={}",
			self.api_url, page_size
		);
		let response = self
			.client
			.get(&url)
			.header("authorization", self.authorization.expose_secret())
			.send()
			.await
			.map_err(|e| FeedError::Network(e.to_string()))?
			.error_for_status()
			.map_err(|e| FeedError::Network(e.to_string()))?;

		let payload: SubscribersResponse = response
			.json()
			.await
			.map_err(|e| FeedError::InvalidResponse(e.to_string()))?;

		let page = Self::page_from_response(payload)?;
		tracing::debug!(
			entries = page.entries.len(),
			has_more = page.has_more,
			"Fetched feed page"
		);
		Ok(page)
	}

	async fn commit_batch(&self, transfers: &[CommittedTransfer]) -> Result<(), FeedError> {
		let url = format!("{}/register", self.api_url);
		self.client
			.post(&url)
			.header("authorization", self.authorization.expose_secret())
			.json(&RegisterRequest { txs: transfers })
			.send()
			.await
			.map_err(|e| FeedError::Network(e.to_string()))?
			.error_for_status()
			.map_err(|e| FeedError::Network(e.to_string()))?;

		tracing::debug!(transfers = transfers.len(), "Committed batch to feed");
		Ok(())
	}
}

/// Registry for the HTTP feed implementation.
pub struct Registry;

impl distro_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = FeedFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn FeedInterface>, FeedError> {
			HttpFeedSchema
				.validate(config)
				.map_err(|e| FeedError::Configuration(e.to_string()))?;
			let parsed: HttpFeedConfig = config
				.clone()
				.try_into()
				.map_err(|e| FeedError::Configuration(format!("Invalid config: {}", e)))?;
			Ok(Box::new(HttpFeed::new(parsed.api_url, parsed.authorization)))
		}
	}
}

impl FeedRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_subscribers_payload() {
		let payload: SubscribersResponse = serde_json::from_str(
			r#"{
				"ok": true,
				"result": [
					{"address": "0x6E6Bda8B1ec708Bd4Ce4f000B464557657988806", "token": "t1"},
					{"address": "0x5FbDB2315678afecb367f032d93F642f64180aa3", "token": "t2"}
				],
				"pendingSubscribers": 7
			}"#,
		)
		.unwrap();
		let page = HttpFeed::page_from_response(payload).unwrap();
		assert_eq!(page.entries.len(), 2);
		assert_eq!(page.entries[0].token, "t1");
		assert!(page.has_more);
	}

	#[test]
	fn empty_page_with_no_pending_is_terminal_shape() {
		let payload: SubscribersResponse =
			serde_json::from_str(r#"{"ok": true, "result": [], "pendingSubscribers": 0}"#).unwrap();
		let page = HttpFeed::page_from_response(payload).unwrap();
		assert!(page.entries.is_empty());
		assert!(!page.has_more);
	}

	#[test]
	fn not_ok_payload_is_invalid() {
		let payload: SubscribersResponse =
			serde_json::from_str(r#"{"ok": false, "result": [], "pendingSubscribers": 0}"#).unwrap();
		let err = HttpFeed::page_from_response(payload).unwrap_err();
		assert!(matches!(err, FeedError::InvalidResponse(_)));
	}

	#[test]
	fn register_body_uses_wire_field_names() {
		let transfers = vec![CommittedTransfer {
			token: "t1".to_string(),
			txid: "0xabc".to_string(),
		}];
		let body = serde_json::to_string(&RegisterRequest { txs: &transfers }).unwrap();
		assert_eq!(body, r#"{"txs":[{"token":"t1","txid":"0xabc"}]}"#);
	}

	#[test]
	fn trailing_slash_is_trimmed() {
		let feed = HttpFeed::new(
			"http://localhost:3000/".to_string(),
			SecretString::from("secret"),
		);
		assert_eq!(feed.api_url, "http://localhost:3000");
	}
}
