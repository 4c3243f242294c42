//! Errors returned by contract calls.

use crate::{
	services::retry::RetryError,
	utils::logging::error::{ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ContractError {
	/// The target or its ABI could not be resolved
	#[error("Resolution error: {0}")]
	Resolution(ErrorContext),

	/// Unknown function, wrong arguments or a missing submitter. Never retried.
	#[error("Invalid call: {0}")]
	InvalidCall(ErrorContext),

	/// The call was retried until cancelled or classified terminal
	#[error("Execution error: {0}")]
	Execution(ErrorContext),

	/// The node answered with data that does not match the function outputs
	#[error("Decode error: {0}")]
	Decode(ErrorContext),

	/// The signing collaborator rejected the transaction
	#[error("Submission error: {0}")]
	Submission(ErrorContext),
}

impl ContractError {
	pub fn resolution(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Resolution(ErrorContext::new(msg, source, metadata))
	}

	pub fn invalid_call(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidCall(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn execution(
		msg: impl Into<String>,
		source: RetryError,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Execution(ErrorContext::new(msg, Some(Box::new(source)), metadata))
	}

	pub fn decode(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Decode(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn submission(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Submission(ErrorContext::new_with_log(msg, source, metadata))
	}

	fn context(&self) -> &ErrorContext {
		match self {
			Self::Resolution(ctx)
			| Self::InvalidCall(ctx)
			| Self::Execution(ctx)
			| Self::Decode(ctx)
			| Self::Submission(ctx) => ctx,
		}
	}

	/// The retry outcome behind an [`ContractError::Execution`]
	pub fn retry_error(&self) -> Option<&RetryError> {
		match self {
			Self::Execution(ctx) => ctx
				.source
				.as_ref()
				.and_then(|source| source.downcast_ref::<RetryError>()),
			_ => None,
		}
	}

	/// Whether the call stopped because its cancellation token fired
	pub fn is_cancelled(&self) -> bool {
		self.retry_error().is_some_and(RetryError::is_cancelled)
	}
}

impl TraceableError for ContractError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
