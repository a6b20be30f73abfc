//! Gas-station style HTTP oracle implementation.
//!
//! Polls a gas station JSON feed and reads its `average` field. The feed
//! reports prices in tenths of gwei, so the value is divided by ten before
//! conversion to wei.

use crate::{GasOracleFactory, GasOracleInterface, GasOracleRegistry, OracleError};
use async_trait::async_trait;
use distro_types::{ConfigSchema, Field, FieldType, GasPrice, Schema, ValidationError};
use serde::Deserialize;

/// Configuration for the station oracle.
#[derive(Debug, Clone, Deserialize)]
struct StationConfig {
	/// URL of the gas station JSON endpoint.
	url: String,
}

/// Relevant subset of the gas station response payload.
#[derive(Debug, Clone, Deserialize)]
struct StationResponse {
	/// Recommended price in tenths of gwei.
	average: f64,
}

/// Gas price oracle backed by a gas-station style HTTP feed.
pub struct StationOracle {
	url: String,
	client: reqwest::Client,
}

impl StationOracle {
	/// Creates a station oracle polling the given endpoint.
	pub fn new(url: String) -> Self {
		Self {
			url,
			client: reqwest::Client::new(),
		}
	}

	/// Converts a station payload into a gas price.
	fn price_from_response(response: &StationResponse) -> Result<GasPrice, OracleError> {
		if !response.average.is_finite() || response.average < 0.0 {
			return Err(OracleError::InvalidResponse(format!(
				"average price out of range: {}",
				response.average
			)));
		}
		// The station reports tenths of gwei
		Ok(GasPrice::from_gwei(response.average / 10.0))
	}
}

/// Configuration schema for the station oracle.
pub struct StationOracleSchema;

impl ConfigSchema for StationOracleSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("url", FieldType::String).with_validator(|value| {
				let url = value.as_str().unwrap_or_default();
				if url.starts_with("http://") || url.starts_with("https://") {
					Ok(())
				} else {
					Err("url must be an http(s) endpoint".to_string())
				}
			})],
			vec![],
		);
		schema.validate(config)
	}
}

#[async_trait]
impl GasOracleInterface for StationOracle {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(StationOracleSchema)
	}

	async fn recommended_gas_price(&self) -> Result<GasPrice, OracleError> {
		let response = self
			.client
			.get(&self.url)
			.send()
			.await
			.map_err(|e| OracleError::Network(e.to_string()))?
			.error_for_status()
			.map_err(|e| OracleError::Network(e.to_string()))?;

		let payload: StationResponse = response
			.json()
			.await
			.map_err(|e| OracleError::InvalidResponse(e.to_string()))?;

		let price = Self::price_from_response(&payload)?;
		tracing::debug!(gas_price = %price, "Fetched recommended gas price");
		Ok(price)
	}
}

/// Registry for the station oracle implementation.
pub struct Registry;

impl distro_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "station";
	type Factory = GasOracleFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn GasOracleInterface>, OracleError> {
			StationOracleSchema
				.validate(config)
				.map_err(|e| OracleError::Configuration(e.to_string()))?;
			let parsed: StationConfig = config
				.clone()
				.try_into()
				.map_err(|e| OracleError::Configuration(format!("Invalid config: {}", e)))?;
			Ok(Box::new(StationOracle::new(parsed.url)))
		}
	}
}

impl GasOracleRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn average_is_tenths_of_gwei() {
		let payload: StationResponse = serde_json::from_str(r#"{"average": 400.0}"#).unwrap();
		let price = StationOracle::price_from_response(&payload).unwrap();
		assert_eq!(price, GasPrice::from_gwei(40.0));
	}

	#[test]
	fn extra_fields_are_ignored() {
		let payload: StationResponse =
			serde_json::from_str(r#"{"average": 125.0, "fast": 300, "safeLow": 100}"#).unwrap();
		let price = StationOracle::price_from_response(&payload).unwrap();
		assert_eq!(price, GasPrice::from_gwei(12.5));
	}

	#[test]
	fn rejects_negative_average() {
		let payload = StationResponse { average: -1.0 };
		assert!(StationOracle::price_from_response(&payload).is_err());
	}

	#[test]
	fn schema_requires_http_url() {
		let config: toml::Value = "url = \"file:///tmp/prices\"".parse().unwrap();
		assert!(StationOracleSchema.validate(&config).is_err());
		let config: toml::Value = "url = \"https://station.example/json\"".parse().unwrap();
		assert!(StationOracleSchema.validate(&config).is_ok());
	}
}
