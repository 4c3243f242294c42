//! Errors returned by name resolution.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ResolverError {
	/// Neither an address, a known alias nor a name the resolver handles
	#[error("Invalid format: {0}")]
	InvalidFormat(ErrorContext),

	/// The name service has no address for the name
	#[error("Not found: {0}")]
	NotFound(ErrorContext),

	/// The connected network has no name service
	#[error("Unsupported: {0}")]
	Unsupported(ErrorContext),

	/// The name service could not be queried
	#[error("Lookup failed: {0}")]
	LookupFailed(ErrorContext),

	#[error("Cancelled: {0}")]
	Cancelled(ErrorContext),
}

// None of these are logged here: the caller decides whether a miss matters.
impl ResolverError {
	pub fn invalid_format(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidFormat(ErrorContext::new(msg, source, metadata))
	}

	pub fn not_found(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotFound(ErrorContext::new(msg, source, metadata))
	}

	pub fn unsupported(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Unsupported(ErrorContext::new(msg, source, metadata))
	}

	pub fn lookup_failed(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::LookupFailed(ErrorContext::new(msg, source, metadata))
	}

	pub fn cancelled(metadata: Option<HashMap<String, String>>) -> Self {
		Self::Cancelled(ErrorContext::new("name resolution cancelled", None, metadata))
	}

	fn context(&self) -> &ErrorContext {
		match self {
			Self::InvalidFormat(ctx)
			| Self::NotFound(ctx)
			| Self::Unsupported(ctx)
			| Self::LookupFailed(ctx)
			| Self::Cancelled(ctx) => ctx,
		}
	}
}

impl TraceableError for ResolverError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
