//! Connection configuration loading and validation.
//!
//! A [`ConnectionConfig`] selects exactly one transport (HTTP with optional
//! fallback endpoints, or a WebSocket), the retry policy shared by every
//! retried operation and the optional block explorer and relay endpoints.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path, str::FromStr};

use crate::{
	models::{
		config::error::ConfigError, ConfigLoader, NetworkIdentity, SecretString, SecretValue,
	},
	services::retry::RetryPolicy,
	utils::{http::RetryConfig, logging::error::BoxError},
};

/// How the connection reaches the node. The two are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum TransportConfig {
	/// JSON-RPC over HTTP. `fallback_urls` are tried in order when the
	/// active endpoint is rate limited or unreachable.
	Http {
		url: SecretValue,
		#[serde(default)]
		fallback_urls: Vec<SecretValue>,
	},
	WebSocket { url: SecretValue },
}

impl TransportConfig {
	/// Every endpoint URL, active one first
	pub fn urls(&self) -> Vec<&SecretValue> {
		match self {
			Self::Http { url, fallback_urls } => {
				std::iter::once(url).chain(fallback_urls.iter()).collect()
			}
			Self::WebSocket { url } => vec![url],
		}
	}
}

/// Settings for a single connection to an Ethereum node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
	pub transport: TransportConfig,

	/// Network the node is expected to serve. Connecting fails when the node
	/// reports a different one.
	#[serde(default)]
	pub network: Option<NetworkIdentity>,

	/// Etherscan API key used to fetch contract ABIs
	#[serde(default)]
	pub explorer_api_key: Option<SecretValue>,

	/// Replaces `https://{subdomain}.etherscan.io` as the explorer base URL
	#[serde(default)]
	pub explorer_url: Option<String>,

	/// Relay endpoint base. Defaults to the HTTP RPC URL.
	#[serde(default)]
	pub relay_url: Option<String>,

	#[serde(default)]
	pub retry: RetryPolicy,

	/// Per-request retries of the HTTP middleware. Off unless configured, so
	/// that `retry` alone decides how often a request is sent.
	#[serde(default = "default_http_retry")]
	pub http_retry: RetryConfig,

	/// Ends contract calls at the first error the node reports as final
	/// (reverts, bad parameters) instead of retrying it
	#[serde(default)]
	pub stop_on_fatal_errors: bool,

	/// Aliases written over the built-in address book (`name` -> hex address)
	#[serde(default)]
	pub address_overrides: HashMap<String, String>,
}

fn default_http_retry() -> RetryConfig {
	RetryConfig::disabled()
}

impl ConnectionConfig {
	fn with_transport(transport: TransportConfig) -> Self {
		Self {
			transport,
			network: None,
			explorer_api_key: None,
			explorer_url: None,
			relay_url: None,
			retry: RetryPolicy::default(),
			http_retry: default_http_retry(),
			stop_on_fatal_errors: false,
			address_overrides: HashMap::new(),
		}
	}

	pub fn http(url: impl Into<String>) -> Self {
		Self::with_transport(TransportConfig::Http {
			url: SecretValue::Plain(SecretString::new(url.into())),
			fallback_urls: Vec::new(),
		})
	}

	pub fn websocket(url: impl Into<String>) -> Self {
		Self::with_transport(TransportConfig::WebSocket {
			url: SecretValue::Plain(SecretString::new(url.into())),
		})
	}

	/// Infura HTTP endpoint for `network`
	pub fn infura(network: NetworkIdentity, project_id: &str) -> Result<Self, ConfigError> {
		let url = network
			.infura_http_url(project_id)
			.ok_or_else(|| unsupported_network("infura", network))?;
		Ok(Self::http(url).with_network(network))
	}

	/// Infura WebSocket endpoint for `network`
	pub fn infura_ws(network: NetworkIdentity, project_id: &str) -> Result<Self, ConfigError> {
		let url = network
			.infura_ws_url(project_id)
			.ok_or_else(|| unsupported_network("infura", network))?;
		Ok(Self::websocket(url).with_network(network))
	}

	/// Hosted mercury node for `network`. The relay uses the untagged endpoint.
	pub fn mercury(network: NetworkIdentity, tag: Option<&str>) -> Result<Self, ConfigError> {
		let (url, relay_url) = network
			.mercury_url(tag)
			.zip(network.mercury_url(None))
			.ok_or_else(|| unsupported_network("mercury", network))?;
		let mut config = Self::http(url).with_network(network);
		config.relay_url = Some(relay_url);
		Ok(config)
	}

	pub fn with_network(mut self, network: NetworkIdentity) -> Self {
		self.network = Some(network);
		self
	}

	pub fn with_fallback_urls(mut self, urls: Vec<String>) -> Self {
		if let TransportConfig::Http { fallback_urls, .. } = &mut self.transport {
			*fallback_urls = urls
				.into_iter()
				.map(|u| SecretValue::Plain(SecretString::new(u)))
				.collect();
		}
		self
	}

	pub fn with_explorer(mut self, api_key: SecretValue, url: Option<String>) -> Self {
		self.explorer_api_key = Some(api_key);
		self.explorer_url = url;
		self
	}

	pub fn with_relay_url(mut self, url: impl Into<String>) -> Self {
		self.relay_url = Some(url.into());
		self
	}

	pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
		self.retry = retry;
		self
	}

	pub fn with_http_retry(mut self, http_retry: RetryConfig) -> Self {
		self.http_retry = http_retry;
		self
	}

	pub fn with_stop_on_fatal_errors(mut self, enabled: bool) -> Self {
		self.stop_on_fatal_errors = enabled;
		self
	}

	pub fn with_address_override(
		mut self,
		name: impl Into<String>,
		address: impl Into<String>,
	) -> Self {
		self.address_overrides.insert(name.into(), address.into());
		self
	}

	/// Relay base URL: the explicit one, else the HTTP RPC endpoint
	pub fn relay_base_url(&self) -> Option<String> {
		match (&self.relay_url, &self.transport) {
			(Some(url), _) => Some(url.clone()),
			(None, TransportConfig::Http { url, .. }) => Some(url.as_str().to_string()),
			(None, TransportConfig::WebSocket { .. }) => None,
		}
	}

	/// Parsed `address_overrides`
	pub fn parsed_overrides(&self) -> Result<Vec<(String, Address)>, ConfigError> {
		self.address_overrides
			.iter()
			.map(|(name, raw)| {
				Address::from_str(raw)
					.map(|address| (name.clone(), address))
					.map_err(|e| {
						ConfigError::validation_error(
							format!("Invalid address for alias '{}'", name),
							Some(Box::new(e)),
							Some(HashMap::from([("address".to_string(), raw.clone())])),
						)
					})
			})
			.collect()
	}
}

fn unsupported_network(provider: &str, network: NetworkIdentity) -> ConfigError {
	ConfigError::validation_error(
		format!("{} does not serve network {}", provider, network),
		None,
		Some(HashMap::from([(
			"provider".to_string(),
			provider.to_string(),
		)])),
	)
}

async fn resolve_secret(secret: &SecretValue, what: &str) -> Result<SecretValue, ConfigError> {
	let resolved = secret.resolve().await.map_err(|e| {
		let message = format!("failed to resolve {}: {}", what, e);
		let source: BoxError = e;
		ConfigError::parse_error(message, Some(source), None)
	})?;
	Ok(SecretValue::Plain(resolved))
}

#[async_trait]
impl ConfigLoader for ConnectionConfig {
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let metadata = || {
			Some(HashMap::from([(
				"path".to_string(),
				path.display().to_string(),
			)]))
		};

		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				"connection config must be a .json file",
				None,
				metadata(),
			));
		}

		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open connection config file: {}", e),
				Some(Box::new(e)),
				metadata(),
			)
		})?;
		let config: ConnectionConfig = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse connection config: {}", e),
				Some(Box::new(e)),
				metadata(),
			)
		})?;

		let config = config.resolve_secrets().await?;
		config.validate()?;

		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let schemes: &[&str] = match self.transport {
			TransportConfig::Http { .. } => &["http", "https"],
			TransportConfig::WebSocket { .. } => &["ws", "wss"],
		};

		for secret in self.transport.urls() {
			let parsed = url::Url::parse(secret.as_str()).map_err(|e| {
				ConfigError::validation_error(
					format!("Invalid endpoint URL: {}", e),
					Some(Box::new(e)),
					None,
				)
			})?;
			if !schemes.contains(&parsed.scheme()) {
				return Err(ConfigError::validation_error(
					format!("Endpoint URL must use one of: {}", schemes.join(", ")),
					None,
					Some(HashMap::from([(
						"scheme".to_string(),
						parsed.scheme().to_string(),
					)])),
				));
			}
		}

		for (field, value) in [
			("explorer_url", &self.explorer_url),
			("relay_url", &self.relay_url),
		] {
			if let Some(value) = value {
				let parsed = url::Url::parse(value).map_err(|e| {
					ConfigError::validation_error(
						format!("Invalid {}: {}", field, e),
						Some(Box::new(e)),
						None,
					)
				})?;
				if !matches!(parsed.scheme(), "http" | "https") {
					return Err(ConfigError::validation_error(
						format!("{} must start with http:// or https://", field),
						None,
						None,
					));
				}
			}
		}

		if let Some(key) = &self.explorer_api_key {
			if key.is_empty() {
				return Err(ConfigError::validation_error(
					"explorer_api_key must not be empty",
					None,
					None,
				));
			}
		}

		self.retry
			.check()
			.map_err(|e| ConfigError::validation_error(e, None, None))?;

		self.parsed_overrides()?;

		self.validate_protocol();

		Ok(())
	}

	fn validate_protocol(&self) {
		for secret in self.transport.urls() {
			// Plain secrets only; environment references are not URLs yet
			if let SecretValue::Plain(url) = secret {
				if url.as_str().starts_with("http://") {
					tracing::warn!("Connection uses an insecure RPC URL");
				}
				if url.as_str().starts_with("ws://") {
					tracing::warn!("Connection uses an insecure WebSocket URL");
				}
			}
		}
		if let Some(relay_url) = &self.relay_url {
			if relay_url.starts_with("http://") {
				tracing::warn!("Connection uses an insecure relay URL: {}", relay_url);
			}
		}
	}

	async fn resolve_secrets(&self) -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();
		let mut config = self.clone();

		config.transport = match &self.transport {
			TransportConfig::Http { url, fallback_urls } => {
				let mut resolved = Vec::with_capacity(fallback_urls.len());
				for fallback in fallback_urls {
					resolved.push(resolve_secret(fallback, "fallback RPC URL").await?);
				}
				TransportConfig::Http {
					url: resolve_secret(url, "RPC URL").await?,
					fallback_urls: resolved,
				}
			}
			TransportConfig::WebSocket { url } => TransportConfig::WebSocket {
				url: resolve_secret(url, "WebSocket URL").await?,
			},
		};

		if let Some(key) = &self.explorer_api_key {
			config.explorer_api_key = Some(resolve_secret(key, "explorer API key").await?);
		}

		Ok(config)
	}
}
