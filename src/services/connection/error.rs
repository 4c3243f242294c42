//! Errors returned by connection-level operations.

use crate::{
	models::ConfigError,
	repositories::RepositoryError,
	services::{
		contract::ContractError, relay::RelayError, resolver::ResolverError, retry::RetryError,
	},
	utils::logging::error::{ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConnectionError {
	/// The node could not be reached or did not report its network
	#[error("Connection error: {0}")]
	ConnectionFailed(ErrorContext),

	/// The node serves a different network than configured
	#[error("Network mismatch: {0}")]
	NetworkMismatch(ErrorContext),

	/// The operation needs per-network configuration the network lacks
	#[error("Unsupported: {0}")]
	Unsupported(ErrorContext),

	/// A node query was retried until cancelled
	#[error("Request error: {0}")]
	Request(ErrorContext),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Repository(#[from] RepositoryError),

	#[error(transparent)]
	Resolver(#[from] ResolverError),

	#[error(transparent)]
	Contract(#[from] ContractError),

	#[error(transparent)]
	Relay(#[from] RelayError),
}

impl ConnectionError {
	pub fn connection_failed(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionFailed(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn network_mismatch(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NetworkMismatch(ErrorContext::new_with_log(msg, None, metadata))
	}

	pub fn unsupported(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Unsupported(ErrorContext::new(msg, None, metadata))
	}

	pub fn request(method: &str, source: RetryError) -> Self {
		Self::Request(ErrorContext::new(
			format!("{} did not succeed", method),
			Some(Box::new(source)),
			Some(HashMap::from([("method".to_string(), method.to_string())])),
		))
	}

	/// Whether the operation stopped because its cancellation token fired
	pub fn is_cancelled(&self) -> bool {
		match self {
			Self::Request(ctx) => ctx
				.source
				.as_ref()
				.and_then(|source| source.downcast_ref::<RetryError>())
				.is_some_and(RetryError::is_cancelled),
			Self::Contract(e) => e.is_cancelled(),
			Self::Resolver(e) => matches!(e, ResolverError::Cancelled(_)),
			Self::Relay(e) => matches!(e, RelayError::Cancelled(_)),
			_ => false,
		}
	}
}

impl TraceableError for ConnectionError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConnectionFailed(ctx)
			| Self::NetworkMismatch(ctx)
			| Self::Unsupported(ctx)
			| Self::Request(ctx) => ctx.trace_id.clone(),
			Self::Config(e) => e.trace_id(),
			Self::Repository(e) => e.trace_id(),
			Self::Resolver(e) => e.trace_id(),
			Self::Contract(e) => e.trace_id(),
			Self::Relay(e) => e.trace_id(),
		}
	}
}
