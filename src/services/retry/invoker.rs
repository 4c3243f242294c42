//! Retry-until-success-or-cancel engine.

use async_trait::async_trait;
use std::{future::Future, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
	services::retry::{RetryError, RetryPolicy},
	utils::logging::error::BoxError,
};

/// What a classifier decided about one attempt
#[derive(Debug)]
pub enum Outcome<T> {
	/// Stop and return the value
	Success(T),
	/// Wait for the next delay and try again
	Retry(BoxError),
	/// Stop and report the error
	Terminal(BoxError),
}

/// An operation the engine can repeat, together with its success predicate.
#[async_trait]
pub trait Attempt: Send + Sync {
	type Output: Send;
	type Error: Send;

	async fn attempt(&self) -> Result<Self::Output, Self::Error>;

	fn classify(&self, result: Result<Self::Output, Self::Error>) -> Outcome<Self::Output>;
}

/// Runs operations until they succeed, are classified terminal, or the
/// caller's token is cancelled.
///
/// Attempts of one call never overlap. Cancellation is observed before every
/// attempt, while an attempt is in flight and during every backoff wait; an
/// attempt that has already completed is always classified first, so a
/// success is never discarded in favour of cancellation.
#[derive(Debug, Clone, Default)]
pub struct RetryingInvoker {
	policy: RetryPolicy,
}

impl RetryingInvoker {
	pub fn new(policy: RetryPolicy) -> Self {
		Self { policy }
	}

	pub fn policy(&self) -> &RetryPolicy {
		&self.policy
	}

	/// Runs an [`Attempt`] under this invoker's policy
	pub async fn run<A: Attempt>(
		&self,
		cancel: &CancellationToken,
		operation: &A,
	) -> Result<A::Output, RetryError> {
		self.run_with(cancel, || operation.attempt(), |result| operation.classify(result))
			.await
	}

	/// Runs `operation` repeatedly, deciding after each attempt with `classify`
	pub async fn run_with<T, R, F, Fut, C>(
		&self,
		cancel: &CancellationToken,
		mut operation: F,
		classify: C,
	) -> Result<T, RetryError>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = R>,
		C: Fn(R) -> Outcome<T>,
	{
		let mut delays = self.policy.delays();
		let mut attempts: u32 = 0;
		let mut last_error: Option<BoxError> = None;

		loop {
			if cancel.is_cancelled() {
				return Err(RetryError::cancelled(attempts, last_error));
			}

			attempts += 1;
			let result = tokio::select! {
				biased;
				result = operation() => result,
				_ = cancel.cancelled() => {
					return Err(RetryError::cancelled(attempts, last_error));
				}
			};

			let error = match classify(result) {
				Outcome::Success(value) => {
					if attempts > 1 {
						debug!(attempts, "operation succeeded after retrying");
					}
					return Ok(value);
				}
				Outcome::Terminal(error) => return Err(RetryError::terminal(attempts, error)),
				Outcome::Retry(error) => error,
			};

			let delay = delays.next().unwrap_or(self.policy.max_delay);
			warn!(
				attempt = attempts,
				delay_ms = delay.as_millis() as u64,
				error = %error,
				"operation failed, retrying"
			);
			last_error = Some(error);

			tokio::select! {
				biased;
				_ = cancel.cancelled() => {
					return Err(RetryError::cancelled(attempts, last_error));
				}
				_ = tokio::time::sleep(delay) => {}
			}
		}
	}
}

/// Returns a child of `parent` that is also cancelled once `timeout` elapses.
///
/// Cancelling the child never cancels `parent`. Must be called from within a
/// Tokio runtime.
pub fn cancel_after(parent: &CancellationToken, timeout: Duration) -> CancellationToken {
	let child = parent.child_token();
	let deadline = child.clone();
	tokio::spawn(async move {
		tokio::select! {
			_ = deadline.cancelled() => {}
			_ = tokio::time::sleep(timeout) => deadline.cancel(),
		}
	});
	child
}
