//! Success predicates for [`RetryingInvoker`](super::RetryingInvoker).
//!
//! - [`no_error`]: any `Ok` is a success
//! - [`non_empty_bytes`]: a contract call must return data
//! - [`present`]: a JSON-RPC field must be present and non-null
//! - [`fatal_or_retry`]: like `no_error`, but errors known to be permanent stop the sequence
//!
//! [`classify`] and [`classify_anyhow`] decide which errors are permanent.

use alloy::primitives::Bytes;
use reqwest_retry::Retryable;

use crate::{
	services::{
		blockchain::{BlockChainError, TransportError},
		relay::RelayError,
		retry::Outcome,
	},
	utils::logging::error::{BoxError, ErrorContext},
};

/// Every error is retried
pub fn no_error<T, E: Into<BoxError>>(result: Result<T, E>) -> Outcome<T> {
	match result {
		Ok(value) => Outcome::Success(value),
		Err(error) => Outcome::Retry(error.into()),
	}
}

/// Errors and empty payloads are retried
pub fn non_empty_bytes<E: Into<BoxError>>(result: Result<Bytes, E>) -> Outcome<Bytes> {
	match result {
		Ok(bytes) if bytes.is_empty() => Outcome::Retry(Box::new(ErrorContext::new(
			"empty response payload",
			None,
			None,
		))),
		Ok(bytes) => Outcome::Success(bytes),
		Err(error) => Outcome::Retry(error.into()),
	}
}

/// Errors and missing values are retried
pub fn present<T, E: Into<BoxError>>(result: Result<Option<T>, E>) -> Outcome<T> {
	match result {
		Ok(Some(value)) => Outcome::Success(value),
		Ok(None) => Outcome::Retry(Box::new(ErrorContext::new(
			"response field not available yet",
			None,
			None,
		))),
		Err(error) => Outcome::Retry(error.into()),
	}
}

/// Errors classified [`Retryable::Fatal`] by [`classify`] stop the sequence
pub fn fatal_or_retry<T, E: Into<BoxError>>(result: Result<T, E>) -> Outcome<T> {
	match result {
		Ok(value) => Outcome::Success(value),
		Err(error) => {
			let error = error.into();
			match classify(error.as_ref()) {
				Retryable::Fatal => Outcome::Terminal(error),
				Retryable::Transient => Outcome::Retry(error),
			}
		}
	}
}

/// Classifies an error by the first crate error found in its source chain.
///
/// Anything unrecognised is transient.
pub fn classify(error: &(dyn std::error::Error + 'static)) -> Retryable {
	classify_chain(std::iter::successors(Some(error), |&err| err.source()))
}

/// Like [`classify`], starting from the error wrapped by `error` itself.
///
/// A boxed `anyhow::Error` only exposes the sources of the wrapped error, so
/// errors raised with `?` are classified here before boxing.
pub fn classify_anyhow(error: &anyhow::Error) -> Retryable {
	classify_chain(error.chain())
}

fn classify_chain<'a>(
	chain: impl Iterator<Item = &'a (dyn std::error::Error + 'static)>,
) -> Retryable {
	for err in chain {
		if let Some(e) = err.downcast_ref::<TransportError>() {
			return e.retryable();
		}
		if let Some(e) = err.downcast_ref::<BlockChainError>() {
			if let Some(retryable) = e.retryable() {
				return retryable;
			}
		}
		if let Some(e) = err.downcast_ref::<RelayError>() {
			return e.retryable();
		}
	}
	Retryable::Transient
}
