//! Errors raised by the RPC client.

use reqwest_retry::Retryable;
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

use crate::utils::logging::error::{ErrorContext, TraceableError};

/// JSON-RPC error codes that mean the request itself is wrong
const FATAL_RPC_CODES: [i64; 4] = [-32600, -32601, -32602, 3];

#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// No endpoint could be reached while connecting
	#[error("Connection error: {0}")]
	ConnectionError(ErrorContext),

	/// The response envelope was missing fields or held unexpected values
	#[error("Request error: {0}")]
	RequestError(ErrorContext),

	/// The node answered with a JSON-RPC `error` object
	#[error("RPC error {code}: {context}")]
	RpcError { code: i64, context: ErrorContext },

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockChainError {
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn request_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new(msg, source, metadata))
	}

	pub fn rpc_error(
		code: i64,
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RpcError {
			code,
			context: ErrorContext::new(msg, None, metadata),
		}
	}

	/// `Some` when this error alone decides whether a retry can help
	pub fn retryable(&self) -> Option<Retryable> {
		match self {
			Self::RpcError { code, .. } if FATAL_RPC_CODES.contains(code) => Some(Retryable::Fatal),
			Self::RpcError { .. } => Some(Retryable::Transient),
			_ => None,
		}
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConnectionError(ctx) | Self::RequestError(ctx) => ctx.trace_id.clone(),
			Self::RpcError { context, .. } => context.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
