//! Gas price representation.
//!
//! Gas prices are carried in wei so that ceiling comparisons are exact
//! integer comparisons, regardless of which unit the source feed reports.

use serde::{Deserialize, Serialize};
use std::fmt;

const WEI_PER_GWEI: f64 = 1e9;

/// A network gas price in wei per gas unit.
///
/// Values are fetched fresh on every poll; a `GasPrice` is never cached
/// across poll cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GasPrice {
	/// Price in wei per gas unit.
	pub wei: u128,
}

impl GasPrice {
	/// Creates a gas price from a wei amount.
	pub fn from_wei(wei: u128) -> Self {
		Self { wei }
	}

	/// Creates a gas price from a gwei amount.
	///
	/// External feeds commonly report gwei, sometimes fractional.
	pub fn from_gwei(gwei: f64) -> Self {
		Self {
			wei: (gwei * WEI_PER_GWEI).round() as u128,
		}
	}

	/// Returns the price in gwei, for display and ceiling logging.
	pub fn as_gwei(&self) -> f64 {
		self.wei as f64 / WEI_PER_GWEI
	}
}

impl fmt::Display for GasPrice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} gwei", self.as_gwei())
	}
}
