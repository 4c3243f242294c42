//! Active/fallback endpoint bookkeeping for the HTTP transport.

use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::services::blockchain::transports::{
	RotatingTransport, TransportError, ROTATE_ON_ERROR_CODES,
};

/// Sends requests to the active endpoint and swaps in a fallback when it is
/// rate limited or unreachable.
///
/// Clones share the same endpoint state.
#[derive(Clone, Debug)]
pub struct EndpointManager {
	pub active_url: Arc<RwLock<String>>,
	pub fallback_urls: Arc<RwLock<Vec<String>>>,
	client: ClientWithMiddleware,
	rotation_lock: Arc<Mutex<()>>,
}

/// Result of sending one request to one URL
#[derive(Debug)]
enum SingleRequestAttemptOutcome {
	/// A response arrived; its status may still be an error
	Response(reqwest::Response),
	NetworkError(reqwest_middleware::Error),
	SerializationError(TransportError),
}

impl EndpointManager {
	pub fn new(client: ClientWithMiddleware, active_url: &str, fallback_urls: Vec<String>) -> Self {
		Self {
			active_url: Arc::new(RwLock::new(active_url.to_string())),
			fallback_urls: Arc::new(RwLock::new(fallback_urls)),
			rotation_lock: Arc::new(Mutex::new(())),
			client,
		}
	}

	/// Makes the first fallback that accepts a connection the active URL.
	///
	/// The previously active URL moves to the end of the fallback list.
	/// Concurrent rotations are serialized.
	pub async fn try_rotate_url<T: RotatingTransport>(
		&self,
		transport: &T,
	) -> Result<String, TransportError> {
		let _guard = self.rotation_lock.lock().await;
		let previous_url = self.active_url.read().await.clone();
		let fallbacks = self.fallback_urls.read().await.clone();

		let new_url = fallbacks
			.iter()
			.find(|url| **url != previous_url)
			.cloned()
			.ok_or_else(|| {
				TransportError::url_rotation(
					format!(
						"No fallback URLs available. Current active: '{}', Fallbacks checked: {:?}",
						previous_url, fallbacks
					),
					None,
					None,
				)
			})?;

		tracing::debug!("Rotating RPC URL from '{}' to '{}'", previous_url, new_url);

		transport.try_connect(&new_url).await.map_err(|e| {
			TransportError::url_rotation(
				format!("Failed to connect to new URL '{}'", new_url),
				Some(e.into()),
				None,
			)
		})?;

		transport.update_client(&new_url).await.map_err(|e| {
			TransportError::url_rotation(
				format!("Failed to update transport client with new URL '{}'", new_url),
				Some(e.into()),
				None,
			)
		})?;

		let mut active_url = self.active_url.write().await;
		let mut fallback_urls = self.fallback_urls.write().await;
		let mut next_fallbacks: Vec<String> = fallback_urls
			.iter()
			.filter(|url| **url != new_url)
			.cloned()
			.collect();
		next_fallbacks.push(previous_url);

		tracing::debug!(
			"Rotated RPC URL to '{}'. Fallbacks: {:?}",
			new_url,
			next_fallbacks
		);

		*fallback_urls = next_fallbacks;
		*active_url = new_url.clone();
		Ok(new_url)
	}

	async fn try_request_on_url<P>(
		&self,
		url: &str,
		transport: &impl RotatingTransport,
		method: &str,
		params: Option<P>,
	) -> SingleRequestAttemptOutcome
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let request_body = transport.customize_request(method, params).await;

		let body = match serde_json::to_string(&request_body) {
			Ok(body) => body,
			Err(e) => {
				return SingleRequestAttemptOutcome::SerializationError(
					TransportError::request_serialization(
						"Failed to serialize request JSON",
						Some(Box::new(e)),
						None,
					),
				);
			}
		};

		match self
			.client
			.post(url)
			.header("Content-Type", "application/json")
			.body(body)
			.send()
			.await
		{
			Ok(response) => SingleRequestAttemptOutcome::Response(response),
			Err(e) => SingleRequestAttemptOutcome::NetworkError(e),
		}
	}

	/// Sends a JSON-RPC request to the active URL, rotating to a fallback on
	/// 429 responses and network errors and repeating the request there.
	///
	/// Returns the parsed response envelope, or the error from the last URL
	/// tried when no fallback is left.
	pub async fn send_raw_request<T, P>(
		&self,
		transport: &T,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		T: RotatingTransport,
		P: Into<Value> + Send + Clone + Serialize,
	{
		loop {
			let url = self.active_url.read().await.clone();

			let outcome = self
				.try_request_on_url(&url, transport, method, params.clone())
				.await;

			match outcome {
				SingleRequestAttemptOutcome::Response(response) => {
					let status = response.status();
					if status.is_success() {
						return response.json().await.map_err(|e| {
							TransportError::response_parse(
								format!("Invalid JSON in response to {}", method),
								Some(Box::new(e)),
								None,
							)
						});
					}

					let body = response.text().await.unwrap_or_default();
					tracing::warn!("Request to {} failed with status {}: {}", url, status, body);

					if !ROTATE_ON_ERROR_CODES.contains(&status.as_u16()) {
						return Err(TransportError::http(status, url, body, None, None));
					}

					if let Err(rotation_error) = self.try_rotate_url(transport).await {
						return Err(TransportError::http(
							status,
							url,
							body,
							Some(Box::new(rotation_error)),
							None,
						));
					}
				}
				SingleRequestAttemptOutcome::NetworkError(network_error) => {
					tracing::warn!("Network error for {}: {}", url, network_error);

					if let Err(rotation_error) = self.try_rotate_url(transport).await {
						return Err(TransportError::network(
							network_error.to_string(),
							Some(Box::new(rotation_error)),
							None,
						));
					}
				}
				SingleRequestAttemptOutcome::SerializationError(e) => return Err(e),
			}
		}
	}
}
