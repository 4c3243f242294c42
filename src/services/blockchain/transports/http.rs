//! JSON-RPC over HTTP with fallback endpoints.

use anyhow::Context;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::{
	services::blockchain::transports::{
		BlockchainTransport, EndpointManager, RotatingTransport, TransientErrorRetryStrategy,
		TransportError, CONNECTION_TEST_METHOD,
	},
	utils::http::{create_base_http_client, create_retryable_http_client, RetryConfig},
};

/// HTTP transport with endpoint rotation.
///
/// The first endpoint that answers `net_version` becomes active; the rest
/// are kept as fallbacks and tried when the active one is rate limited or
/// unreachable. Transient HTTP failures are retried by the client middleware
/// before they reach the caller.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	pub client: ClientWithMiddleware,
	endpoint_manager: EndpointManager,
}

fn connection_test_request() -> Value {
	json!({
		"jsonrpc": "2.0",
		"id": 1,
		"method": CONNECTION_TEST_METHOD,
		"params": []
	})
}

impl HttpTransportClient {
	/// Connects to the first reachable endpoint in `endpoints`.
	///
	/// Endpoints that are not valid URLs or that answer with an error status
	/// are skipped.
	pub async fn new(endpoints: &[String], retry_config: &RetryConfig) -> Result<Self, anyhow::Error> {
		let base_http_client = create_base_http_client().context("Failed to create base HTTP client")?;
		let retryable_client = create_retryable_http_client(
			retry_config,
			base_http_client,
			Some(TransientErrorRetryStrategy),
		);

		for endpoint in endpoints {
			let url = match Url::parse(endpoint) {
				Ok(url) => url,
				Err(e) => {
					tracing::warn!("Skipping invalid RPC URL {}: {}", endpoint, e);
					continue;
				}
			};

			let response = match retryable_client
				.post(url)
				.json(&connection_test_request())
				.send()
				.await
			{
				Ok(response) => response,
				Err(e) => {
					tracing::debug!("RPC endpoint {} unreachable: {}", endpoint, e);
					continue;
				}
			};

			if !response.status().is_success() {
				tracing::debug!(
					"RPC endpoint {} answered with status {}",
					endpoint,
					response.status()
				);
				continue;
			}

			let fallback_urls: Vec<String> = endpoints
				.iter()
				.filter(|other| *other != endpoint)
				.cloned()
				.collect();

			return Ok(Self {
				client: retryable_client.clone(),
				endpoint_manager: EndpointManager::new(retryable_client, endpoint, fallback_urls),
			});
		}

		Err(anyhow::anyhow!("All RPC URLs failed to connect"))
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.endpoint_manager.active_url.read().await.clone()
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.endpoint_manager
			.send_raw_request(self, method, params)
			.await
	}
}

#[async_trait]
impl RotatingTransport for HttpTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		let url = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;

		let response = self
			.client
			.post(url.clone())
			.json(&connection_test_request())
			.send()
			.await
			.map_err(|e| anyhow::anyhow!("Failed to connect to {}: {}", url, e))?;

		let status = response.status();
		if !status.is_success() {
			return Err(anyhow::anyhow!(
				"Failed to connect to {}: {}",
				url,
				status.as_u16()
			));
		}
		Ok(())
	}

	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		let parsed_url = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;
		let normalized_url = parsed_url.as_str().trim_end_matches('/');

		// Requests always go to the active URL, so switching it is enough
		let mut active_url = self.endpoint_manager.active_url.write().await;
		*active_url = normalized_url.to_string();
		Ok(())
	}
}
