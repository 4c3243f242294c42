//! Errors returned by the relay client.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use reqwest_retry::Retryable;
use std::collections::HashMap;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum RelayError {
	/// The relay answered with an explicit error. Retrying cannot change it.
	#[error("Relay rejected transaction (HTTP {status}): {context}")]
	Rejected { status: u16, context: ErrorContext },

	/// The relay could not be reached
	#[error("Network error: {0}")]
	Network(ErrorContext),

	/// The relay answered with a body that could not be read
	#[error("Response error: {0}")]
	Response(ErrorContext),

	/// Cancelled before the relay accepted the transaction
	#[error("Cancelled: {0}")]
	Cancelled(ErrorContext),
}

impl RelayError {
	pub fn rejected(
		status: u16,
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Rejected {
			status,
			context: ErrorContext::new_with_log(msg, None, metadata),
		}
	}

	// Network and response errors are retried; they are not logged here.
	pub fn network(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Network(ErrorContext::new(msg, source, metadata))
	}

	pub fn response(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Response(ErrorContext::new(msg, source, metadata))
	}

	pub fn cancelled(
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Cancelled(ErrorContext::new("relay cancelled", source, metadata))
	}

	/// Rejections are final, everything else may succeed on a later attempt
	pub fn retryable(&self) -> Retryable {
		match self {
			Self::Rejected { .. } | Self::Cancelled(_) => Retryable::Fatal,
			Self::Network(_) | Self::Response(_) => Retryable::Transient,
		}
	}

	/// Error text returned by the relay, for rejections
	pub fn rejection(&self) -> Option<&str> {
		match self {
			Self::Rejected { context, .. } => Some(context.message.as_str()),
			_ => None,
		}
	}
}

impl TraceableError for RelayError {
	fn trace_id(&self) -> String {
		match self {
			Self::Rejected { context, .. } => context.trace_id.clone(),
			Self::Network(ctx) | Self::Response(ctx) | Self::Cancelled(ctx) => {
				ctx.trace_id.clone()
			}
		}
	}
}
