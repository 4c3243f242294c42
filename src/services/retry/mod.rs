//! Retrying execution of blockchain operations.
//!
//! [`RetryingInvoker`] repeats an operation with exponential backoff until it
//! succeeds, its classifier declares it terminal, or a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) fires. What
//! counts as success is decided per call site by a predicate from
//! [`predicates`] or by an [`Attempt`] implementation.

mod error;
mod invoker;
mod policy;
pub mod predicates;

pub use error::RetryError;
pub use invoker::{cancel_after, Attempt, Outcome, RetryingInvoker};
pub use policy::RetryPolicy;
