//! Client for a transaction relay.
//!
//! The relay accepts `{address, fnName, data}` on `POST {url}/relay`, where
//! `data` is the list of hex-encoded arguments, and answers `{txHash}` with
//! HTTP 200 or `{error}` otherwise.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::services::{
	relay::RelayError,
	retry::{Attempt, Outcome, RetryError, RetryingInvoker},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RelayRequest {
	pub address: String,
	#[serde(rename = "fnName")]
	pub fn_name: String,
	pub data: Vec<String>,
}

impl RelayRequest {
	pub fn new(address: impl Into<String>, fn_name: impl Into<String>, params: &[Vec<u8>]) -> Self {
		Self {
			address: address.into(),
			fn_name: fn_name.into(),
			data: params.iter().map(hex::encode).collect(),
		}
	}
}

#[derive(Debug, Deserialize)]
struct RelaySuccess {
	#[serde(rename = "txHash", default)]
	tx_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelayFailure {
	error: String,
}

/// One POST to the relay
struct RelayAttempt<'a> {
	client: &'a reqwest::Client,
	url: &'a str,
	request: &'a RelayRequest,
}

#[async_trait]
impl<'a> Attempt for RelayAttempt<'a> {
	type Output = String;
	type Error = RelayError;

	async fn attempt(&self) -> Result<String, RelayError> {
		let metadata = || Some(HashMap::from([("url".to_string(), self.url.to_string())]));

		let response = self
			.client
			.post(self.url)
			.json(self.request)
			.send()
			.await
			.map_err(|e| RelayError::network("relay request failed", Some(Box::new(e)), metadata()))?;

		let status = response.status();
		let body = response.bytes().await.map_err(|e| {
			RelayError::network("failed to read relay response", Some(Box::new(e)), metadata())
		})?;

		if status.is_success() {
			let success: RelaySuccess = serde_json::from_slice(&body).map_err(|e| {
				RelayError::response("relay response is not JSON", Some(Box::new(e)), metadata())
			})?;
			return success
				.tx_hash
				.filter(|hash| !hash.is_empty())
				.ok_or_else(|| RelayError::response("relay response has no txHash", None, metadata()));
		}

		match serde_json::from_slice::<RelayFailure>(&body) {
			Ok(failure) => Err(RelayError::rejected(status.as_u16(), failure.error, metadata())),
			Err(e) => Err(RelayError::response(
				format!("relay returned HTTP {}", status),
				Some(Box::new(e)),
				metadata(),
			)),
		}
	}

	fn classify(&self, result: Result<String, RelayError>) -> Outcome<String> {
		match result {
			Ok(hash) => Outcome::Success(hash),
			Err(error) => match error.retryable() {
				reqwest_retry::Retryable::Fatal => Outcome::Terminal(Box::new(error)),
				reqwest_retry::Retryable::Transient => Outcome::Retry(Box::new(error)),
			},
		}
	}
}

/// Relays transactions through a remote service, retrying until the relay
/// answers or the caller cancels.
#[derive(Clone, Debug)]
pub struct RelayClient {
	client: reqwest::Client,
	url: String,
	invoker: RetryingInvoker,
}

impl RelayClient {
	/// `base_url` is the relay root; requests go to `{base_url}/relay`
	pub fn new(client: reqwest::Client, base_url: &str, invoker: RetryingInvoker) -> Self {
		Self {
			client,
			url: format!("{}/relay", base_url.trim_end_matches('/')),
			invoker,
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	/// Relays a call of `fn_name` on `address` and returns the transaction hash
	#[instrument(skip(self, cancel, params), fields(params = params.len()))]
	pub async fn relay(
		&self,
		cancel: &CancellationToken,
		address: &str,
		fn_name: &str,
		params: &[Vec<u8>],
	) -> Result<String, RelayError> {
		let request = RelayRequest::new(address, fn_name, params);
		let attempt = RelayAttempt {
			client: &self.client,
			url: &self.url,
			request: &request,
		};

		match self.invoker.run(cancel, &attempt).await {
			Ok(hash) => {
				info!(%hash, "transaction relayed");
				Ok(hash)
			}
			Err(error @ RetryError::Cancelled { .. }) => {
				Err(RelayError::cancelled(Some(Box::new(error)), None))
			}
			Err(error) => match error.into_last_error().map(|e| e.downcast::<RelayError>()) {
				Some(Ok(relay_error)) => Err(*relay_error),
				Some(Err(other)) => Err(RelayError::response("relay failed", Some(other), None)),
				None => Err(RelayError::response("relay failed", None, None)),
			},
		}
	}
}
