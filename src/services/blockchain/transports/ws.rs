//! JSON-RPC over a WebSocket connection.

use alloy::{
	providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
	transports::{RpcError, TransportErrorKind},
};
use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::borrow::Cow;

use crate::services::blockchain::transports::{BlockchainTransport, TransportError};

/// WebSocket transport backed by an alloy pub-sub provider.
///
/// There is no endpoint rotation: the connection is made once and the
/// provider reconnects on its own.
#[derive(Clone)]
pub struct WsTransportClient {
	provider: DynProvider,
	url: String,
}

impl std::fmt::Debug for WsTransportClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WsTransportClient")
			.field("url", &self.url)
			.finish_non_exhaustive()
	}
}

impl WsTransportClient {
	pub async fn new(url: &str) -> Result<Self, anyhow::Error> {
		let provider = ProviderBuilder::new()
			.connect_ws(WsConnect::new(url))
			.await
			.with_context(|| format!("Failed to open WebSocket connection to {}", url))?
			.erased();

		Ok(Self {
			provider,
			url: url.to_string(),
		})
	}

	/// Maps a provider error back onto the shape an HTTP node would produce.
	///
	/// Error responses from the node become a JSON-RPC `error` envelope so
	/// callers handle both transports the same way.
	fn to_envelope(
		&self,
		method: &str,
		result: Result<Value, RpcError<TransportErrorKind>>,
	) -> Result<Value, TransportError> {
		match result {
			Ok(value) => Ok(json!({ "jsonrpc": "2.0", "id": 1, "result": value })),
			Err(RpcError::ErrorResp(payload)) => Ok(json!({
				"jsonrpc": "2.0",
				"id": 1,
				"error": { "code": payload.code, "message": payload.message }
			})),
			Err(RpcError::SerError(e)) => Err(TransportError::request_serialization(
				format!("Failed to serialize params for {}", method),
				Some(Box::new(e)),
				None,
			)),
			Err(RpcError::DeserError { err, text }) => Err(TransportError::response_parse(
				format!("Failed to parse response to {}: {}", method, text),
				Some(Box::new(err)),
				None,
			)),
			Err(other) => Err(TransportError::network(
				format!("WebSocket request {} to {} failed", method, self.url),
				Some(Box::new(other)),
				None,
			)),
		}
	}
}

#[async_trait]
impl BlockchainTransport for WsTransportClient {
	async fn get_current_url(&self) -> String {
		self.url.clone()
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let params: Value = params.map(|p| p.into()).unwrap_or_else(|| json!([]));
		let result = self
			.provider
			.raw_request::<Value, Value>(Cow::Owned(method.to_string()), params)
			.await;
		self.to_envelope(method, result)
	}
}
