//! Errors returned while resolving a contract ABI.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AbiError {
	/// The network has no block explorer to ask
	#[error("Unsupported network: {0}")]
	Unsupported(ErrorContext),

	/// The explorer could not be reached or refused the request
	#[error("Remote failure: {0}")]
	RemoteFailure(ErrorContext),

	/// The explorer answered with something that is not an ABI
	#[error("Parse error: {0}")]
	Parse(ErrorContext),
}

impl AbiError {
	pub fn unsupported(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Unsupported(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn remote_failure(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RemoteFailure(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn parse(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Parse(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for AbiError {
	fn trace_id(&self) -> String {
		match self {
			Self::Unsupported(ctx) | Self::RemoteFailure(ctx) | Self::Parse(ctx) => {
				ctx.trace_id.clone()
			}
		}
	}
}
