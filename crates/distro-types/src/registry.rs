//! Registry trait for self-registering implementations.
//!
//! Each pluggable component (account, gas oracle, feed, delivery) provides a
//! `Registry` struct implementing this trait, tying its configuration name
//! to a factory function.

/// Base trait for implementation registries.
///
/// The `NAME` is the key used in the configuration file to select the
/// implementation, for example:
/// - "local" for `account.implementations.local`
/// - "station" for `gas.implementations.station`
/// - "http" for `feed.implementations.http`
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	///
	/// Each component crate defines its own factory type, for example
	/// `FeedFactory` for feed implementations.
	type Factory;

	/// Returns the factory function for this implementation.
	fn factory() -> Self::Factory;
}
