//! JSON-RPC transports for talking to an Ethereum node.
//!
//! - [`HttpTransportClient`]: HTTP POST with fallback endpoints and rotation
//! - [`WsTransportClient`]: a single WebSocket connection
//! - [`EthTransport`]: one of the two, chosen when connecting

mod endpoint_manager;
mod error;
mod http;
mod ws;

pub use endpoint_manager::EndpointManager;
pub use error::TransportError;
pub use http::HttpTransportClient;
pub use ws::WsTransportClient;

use reqwest_retry::{
	default_on_request_failure, default_on_request_success, Retryable, RetryableStrategy,
};
use serde::Serialize;
use serde_json::{json, Value};

/// HTTP status codes that trigger RPC endpoint rotation
/// - 429: Too Many Requests - indicates rate limiting from the current endpoint
pub const ROTATE_ON_ERROR_CODES: [u16; 1] = [429];

/// Request used to check that an endpoint is alive
pub const CONNECTION_TEST_METHOD: &str = "net_version";

/// Base trait for all node transports.
///
/// Responses are full JSON-RPC envelopes: the caller reads `result` or `error`.
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Get the current URL being used by the transport
	async fn get_current_url(&self) -> String;

	/// Send a raw request to the node
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Builds the JSON-RPC 2.0 request body
	async fn customize_request<P>(&self, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params.map(|p| p.into()).unwrap_or_else(|| json!([]))
		})
	}
}

/// Extension trait for transports that support URL rotation
#[async_trait::async_trait]
pub trait RotatingTransport: BlockchainTransport {
	/// Attempts to establish a connection with a new URL
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error>;

	/// Updates the client with a new URL
	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error>;
}

/// Retries requests that failed for transient reasons, based on status code
/// or connection error
pub struct TransientErrorRetryStrategy;
impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(success) => default_on_request_success(success),
			Err(error) => default_on_request_failure(error),
		}
	}
}

/// The transport a connection was set up with.
///
/// HTTP and WebSocket are mutually exclusive; the choice is made once from
/// configuration.
#[derive(Clone, Debug)]
pub enum EthTransport {
	Http(HttpTransportClient),
	Ws(WsTransportClient),
}

#[async_trait::async_trait]
impl BlockchainTransport for EthTransport {
	async fn get_current_url(&self) -> String {
		match self {
			Self::Http(client) => client.get_current_url().await,
			Self::Ws(client) => client.get_current_url().await,
		}
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		match self {
			Self::Http(client) => client.send_raw_request(method, params).await,
			Self::Ws(client) => client.send_raw_request(method, params).await,
		}
	}
}
