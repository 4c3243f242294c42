//! Errors returned by the retry engine.

use crate::utils::logging::error::{BoxError, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Why a retried operation stopped without succeeding.
///
/// The operation's own error is never returned directly: it is the source of
/// the context so callers can still inspect it.
#[derive(ThisError, Debug)]
pub enum RetryError {
	/// The cancellation token fired, either before an attempt, during one or
	/// while waiting for the next.
	#[error("Operation cancelled after {attempts} attempt(s): {context}")]
	Cancelled {
		attempts: u32,
		#[source]
		context: ErrorContext,
	},

	/// The classifier reported a failure that retrying cannot fix
	#[error("Operation failed permanently after {attempts} attempt(s): {context}")]
	Terminal {
		attempts: u32,
		#[source]
		context: ErrorContext,
	},
}

impl RetryError {
	pub fn cancelled(attempts: u32, last_error: Option<BoxError>) -> Self {
		let metadata = HashMap::from([("attempts".to_string(), attempts.to_string())]);
		Self::Cancelled {
			attempts,
			context: ErrorContext::new("cancellation requested", last_error, Some(metadata)),
		}
	}

	pub fn terminal(attempts: u32, error: BoxError) -> Self {
		let message = error.to_string();
		Self::Terminal {
			attempts,
			context: ErrorContext::new_with_log(message, Some(error), None),
		}
	}

	/// Number of attempts made before stopping
	pub fn attempts(&self) -> u32 {
		match self {
			Self::Cancelled { attempts, .. } | Self::Terminal { attempts, .. } => *attempts,
		}
	}

	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled { .. })
	}

	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Terminal { .. })
	}

	/// The operation error that ended the sequence, if any attempt failed
	pub fn last_error(&self) -> Option<&BoxError> {
		match self {
			Self::Cancelled { context, .. } | Self::Terminal { context, .. } => {
				context.source.as_ref()
			}
		}
	}

	/// Takes the operation error that ended the sequence
	pub fn into_last_error(self) -> Option<BoxError> {
		match self {
			Self::Cancelled { context, .. } | Self::Terminal { context, .. } => context.source,
		}
	}

	/// Looks for an error of type `E` as the last operation error or one of its sources
	pub fn find_cause<E: std::error::Error + 'static>(&self) -> Option<&E> {
		let mut current: Option<&(dyn std::error::Error + 'static)> = self
			.last_error()
			.map(|e| e.as_ref() as &(dyn std::error::Error + 'static));
		while let Some(err) = current {
			if let Some(found) = err.downcast_ref::<E>() {
				return Some(found);
			}
			current = err.source();
		}
		None
	}
}

impl TraceableError for RetryError {
	fn trace_id(&self) -> String {
		match self {
			Self::Cancelled { context, .. } | Self::Terminal { context, .. } => {
				context.trace_id.clone()
			}
		}
	}
}
