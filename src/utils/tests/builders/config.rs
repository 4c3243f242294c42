use crate::{
	models::{ConnectionConfig, NetworkIdentity, SecretString, SecretValue},
	services::retry::RetryPolicy,
};
use std::time::Duration;

/// Builder for connection settings used in tests.
///
/// Defaults to a local HTTP node with a fast retry policy, so failing tests
/// finish quickly.
pub struct ConnectionConfigBuilder {
	config: ConnectionConfig,
}

impl Default for ConnectionConfigBuilder {
	fn default() -> Self {
		Self {
			config: ConnectionConfig::http("http://localhost:8545").with_retry(fast_retry_policy()),
		}
	}
}

/// Retry policy with millisecond delays
pub fn fast_retry_policy() -> RetryPolicy {
	RetryPolicy {
		initial_delay: Duration::from_millis(1),
		max_delay: Duration::from_millis(5),
		..RetryPolicy::default()
	}
}

impl ConnectionConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn http(mut self, url: &str) -> Self {
		let retry = self.config.retry.clone();
		let http_retry = self.config.http_retry.clone();
		self.config = ConnectionConfig {
			retry,
			http_retry,
			stop_on_fatal_errors: self.config.stop_on_fatal_errors,
			..ConnectionConfig::http(url)
		};
		self
	}

	pub fn network(mut self, network: NetworkIdentity) -> Self {
		self.config = self.config.with_network(network);
		self
	}

	pub fn explorer(mut self, api_key: &str, url: &str) -> Self {
		self.config = self.config.with_explorer(
			SecretValue::Plain(SecretString::new(api_key.to_string())),
			Some(url.to_string()),
		);
		self
	}

	pub fn relay_url(mut self, url: &str) -> Self {
		self.config = self.config.with_relay_url(url);
		self
	}

	pub fn retry(mut self, retry: RetryPolicy) -> Self {
		self.config = self.config.with_retry(retry);
		self
	}

	pub fn fallback_urls(mut self, urls: &[&str]) -> Self {
		self.config = self
			.config
			.with_fallback_urls(urls.iter().map(|u| u.to_string()).collect());
		self
	}

	pub fn stop_on_fatal_errors(mut self) -> Self {
		self.config = self.config.with_stop_on_fatal_errors(true);
		self
	}

	pub fn address(mut self, name: &str, address: &str) -> Self {
		self.config = self.config.with_address_override(name, address);
		self
	}

	pub fn build(self) -> ConnectionConfig {
		self.config
	}
}
