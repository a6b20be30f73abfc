//! Fixed gas price oracle for testing and dry runs.
//!
//! Always reports the configured price. Useful on development networks
//! where no gas station feed exists, and for exercising the scheduler's
//! admission control deterministically.

use crate::{GasOracleFactory, GasOracleInterface, GasOracleRegistry, OracleError};
use async_trait::async_trait;
use distro_types::{ConfigSchema, GasPrice, ValidationError};
use serde::Deserialize;

/// Configuration for the fixed oracle.
#[derive(Debug, Clone, Deserialize)]
struct FixedConfig {
	/// The price to report, in gwei.
	gas_price_gwei: f64,
}

/// Gas price oracle that always reports one configured price.
pub struct FixedOracle {
	price: GasPrice,
}

impl FixedOracle {
	/// Creates a fixed oracle reporting the given price.
	pub fn new(price: GasPrice) -> Self {
		Self { price }
	}
}

/// Configuration schema for the fixed oracle.
pub struct FixedOracleSchema;

impl ConfigSchema for FixedOracleSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// The price may be an integer or a float; the schema field types
		// cover integers only, so the number check is done by hand.
		let value = config
			.get("gas_price_gwei")
			.ok_or_else(|| ValidationError::MissingField("gas_price_gwei".to_string()))?;
		if !value.is_integer() && !value.is_float() {
			return Err(ValidationError::TypeMismatch {
				field: "gas_price_gwei".to_string(),
				expected: "number".to_string(),
				actual: value.type_str().to_string(),
			});
		}
		Ok(())
	}
}

#[async_trait]
impl GasOracleInterface for FixedOracle {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FixedOracleSchema)
	}

	async fn recommended_gas_price(&self) -> Result<GasPrice, OracleError> {
		Ok(self.price)
	}
}

/// Registry for the fixed oracle implementation.
pub struct Registry;

impl distro_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "fixed";
	type Factory = GasOracleFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn GasOracleInterface>, OracleError> {
			FixedOracleSchema
				.validate(config)
				.map_err(|e| OracleError::Configuration(e.to_string()))?;
			let parsed: FixedConfig = config
				.clone()
				.try_into()
				.map_err(|e| OracleError::Configuration(format!("Invalid config: {}", e)))?;
			if !(parsed.gas_price_gwei >= 0.0) {
				return Err(OracleError::Configuration(
					"gas_price_gwei must be non-negative".to_string(),
				));
			}
			Ok(Box::new(FixedOracle::new(GasPrice::from_gwei(
				parsed.gas_price_gwei,
			))))
		}
	}
}

impl GasOracleRegistry for Registry {}
