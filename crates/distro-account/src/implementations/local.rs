//! Local private-key account implementation.
//!
//! Holds a raw secp256k1 private key supplied through configuration. This
//! matches the operational model of the distribution scripts: the operator
//! provides an unlocked key and the process signs with it directly.

use crate::{AccountError, AccountFactory, AccountInterface, AccountRegistry};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use distro_types::{
	with_0x_prefix, without_0x_prefix, Address, ConfigSchema, Field, FieldType, Schema,
	SecretString, ValidationError,
};
use serde::Deserialize;

/// Configuration for the local account implementation.
#[derive(Debug, Clone, Deserialize)]
struct LocalAccountConfig {
	/// The private key, hex-encoded, with or without 0x prefix.
	private_key: SecretString,
}

/// Account implementation backed by an in-process private key.
pub struct LocalAccount {
	/// Parsed signer, used to derive the account address.
	signer: PrivateKeySigner,
	/// The normalized (0x-prefixed) key handed to the delivery layer.
	key: SecretString,
}

impl LocalAccount {
	/// Creates a local account from a hex-encoded private key.
	pub fn new(private_key: &SecretString) -> Result<Self, AccountError> {
		let normalized = with_0x_prefix(private_key.expose_secret());
		let signer = normalized
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(e.to_string()))?;
		Ok(Self {
			signer,
			key: SecretString::new(normalized),
		})
	}
}

/// Configuration schema for the local account implementation.
pub struct LocalAccountSchema;

impl ConfigSchema for LocalAccountSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("private_key", FieldType::String).with_validator(|value| {
					let key = without_0x_prefix(value.as_str().unwrap_or_default());
					if key.len() != 64 {
						return Err(format!(
							"private key must be 64 hex characters, got {}",
							key.len()
						));
					}
					if !key.chars().all(|c| c.is_ascii_hexdigit()) {
						return Err("private key must be hex-encoded".to_string());
					}
					Ok(())
				}),
			],
			vec![],
		);
		schema.validate(config)
	}
}

#[async_trait]
impl AccountInterface for LocalAccount {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LocalAccountSchema)
	}

	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	fn private_key(&self) -> SecretString {
		self.key.clone()
	}
}

/// Registry for the local account implementation.
pub struct Registry;

impl distro_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "local";
	type Factory = AccountFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn AccountInterface>, AccountError> {
			LocalAccountSchema
				.validate(config)
				.map_err(|e| AccountError::InvalidKey(e.to_string()))?;
			let parsed: LocalAccountConfig = config
				.clone()
				.try_into()
				.map_err(|e| AccountError::Implementation(format!("Invalid config: {}", e)))?;
			Ok(Box::new(LocalAccount::new(&parsed.private_key)?))
		}
	}
}

impl AccountRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	// Address derived from private key 0x...01
	const KEY_ONE_ADDRESS: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

	#[tokio::test]
	async fn derives_address_from_key() {
		let key = SecretString::from(
			"0x0000000000000000000000000000000000000000000000000000000000000001",
		);
		let account = LocalAccount::new(&key).unwrap();
		let address = account.address().await.unwrap();
		assert_eq!(address, KEY_ONE_ADDRESS.parse::<Address>().unwrap());
	}

	#[tokio::test]
	async fn accepts_key_without_prefix() {
		let key = SecretString::from(
			"0000000000000000000000000000000000000000000000000000000000000001",
		);
		let account = LocalAccount::new(&key).unwrap();
		assert!(account.private_key().expose_secret().starts_with("0x"));
	}

	#[test]
	fn schema_rejects_short_key() {
		let config: toml::Value = "private_key = \"0xabcd\"".parse().unwrap();
		assert!(LocalAccountSchema.validate(&config).is_err());
	}

	#[test]
	fn rejects_garbage_key() {
		let key = SecretString::from("zz".repeat(32).as_str());
		assert!(LocalAccount::new(&key).is_err());
	}
}
