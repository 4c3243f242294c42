//! Errors raised while moving JSON-RPC requests to and from a node.

use reqwest_retry::Retryable;
use std::collections::HashMap;
use thiserror::Error;

use crate::utils::logging::error::{ErrorContext, TraceableError};

#[derive(Debug, Error)]
pub enum TransportError {
	/// The endpoint answered with a non-success status
	#[error("HTTP error: status {status_code} for URL {url}")]
	Http {
		status_code: reqwest::StatusCode,
		url: String,
		body: String,
		context: ErrorContext,
	},

	/// The request never produced a response
	#[error("Network error: {0}")]
	Network(ErrorContext),

	#[error("Failed to parse JSON response: {0}")]
	ResponseParse(ErrorContext),

	#[error("Failed to serialize request JSON: {0}")]
	RequestSerialization(ErrorContext),

	/// No fallback endpoint could take over
	#[error("URL rotation failed: {0}")]
	UrlRotation(ErrorContext),
}

// Transport failures happen inside retried operations, so they are not logged
// here. The retry engine reports each failed attempt.
impl TransportError {
	pub fn http(
		status_code: reqwest::StatusCode,
		url: String,
		body: String,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let msg = format!("HTTP error: status {} for URL {}", status_code, url);

		Self::Http {
			status_code,
			url,
			body,
			context: ErrorContext::new(msg, source, metadata),
		}
	}

	pub fn network(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Network(ErrorContext::new(msg, source, metadata))
	}

	pub fn response_parse(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParse(ErrorContext::new(msg, source, metadata))
	}

	pub fn request_serialization(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestSerialization(ErrorContext::new(msg, source, metadata))
	}

	pub fn url_rotation(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::UrlRotation(ErrorContext::new(msg, source, metadata))
	}

	/// Whether repeating the same request could succeed.
	///
	/// Status codes follow the same rules as `reqwest_retry`'s default
	/// strategy: server errors, 408 and 429 are transient, any other client
	/// error is fatal.
	pub fn retryable(&self) -> Retryable {
		match self {
			Self::Http { status_code, .. } => {
				if status_code.is_server_error()
					|| *status_code == reqwest::StatusCode::REQUEST_TIMEOUT
					|| *status_code == reqwest::StatusCode::TOO_MANY_REQUESTS
				{
					Retryable::Transient
				} else if status_code.is_client_error() {
					Retryable::Fatal
				} else {
					Retryable::Transient
				}
			}
			Self::RequestSerialization(_) => Retryable::Fatal,
			Self::Network(_) | Self::ResponseParse(_) | Self::UrlRotation(_) => {
				Retryable::Transient
			}
		}
	}
}

impl TraceableError for TransportError {
	fn trace_id(&self) -> String {
		match self {
			Self::Http { context, .. } => context.trace_id.clone(),
			Self::Network(ctx)
			| Self::ResponseParse(ctx)
			| Self::RequestSerialization(ctx)
			| Self::UrlRotation(ctx) => ctx.trace_id.clone(),
		}
	}
}
