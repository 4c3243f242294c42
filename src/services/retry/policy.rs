//! Backoff schedule shared by every retried operation.

use backon::{BackoffBuilder, ExponentialBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::http::JitterSetting;

fn default_initial_delay() -> Duration {
	Duration::from_millis(1000)
}

fn default_factor() -> f32 {
	1.6
}

fn default_max_delay() -> Duration {
	Duration::from_secs(30)
}

fn default_jitter() -> JitterSetting {
	JitterSetting::None
}

/// Delay schedule between attempts.
///
/// Delays start at `initial_delay`, grow by `factor` after every failed
/// attempt and are clamped at `max_delay`. There is no attempt cap: only
/// cancellation or a terminal classification ends a retry sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RetryPolicy {
	#[serde(default = "default_initial_delay")]
	pub initial_delay: Duration,
	#[serde(default = "default_factor")]
	pub factor: f32,
	#[serde(default = "default_max_delay")]
	pub max_delay: Duration,
	#[serde(default = "default_jitter")]
	pub jitter: JitterSetting,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			initial_delay: default_initial_delay(),
			factor: default_factor(),
			max_delay: default_max_delay(),
			jitter: default_jitter(),
		}
	}
}

impl RetryPolicy {
	/// An endless iterator over the waits between consecutive attempts.
	///
	/// Jittered waits are clamped to `max_delay` and never shorter than the
	/// wait before them.
	pub fn delays(&self) -> impl Iterator<Item = Duration> + Send {
		let max_delay = self.max_delay;
		let builder = ExponentialBuilder::default()
			.with_min_delay(self.initial_delay)
			.with_max_delay(self.max_delay)
			.with_factor(self.factor)
			.without_max_times();

		match self.jitter {
			JitterSetting::Full => builder.with_jitter(),
			JitterSetting::None => builder,
		}
		.build()
		.scan(Duration::ZERO, move |previous, delay| {
			*previous = delay.min(max_delay).max(*previous);
			Some(*previous)
		})
	}

	/// Checks that the schedule starts above zero, grows and is bounded
	pub fn check(&self) -> Result<(), String> {
		if self.initial_delay.is_zero() {
			return Err("initial_delay must be greater than zero".to_string());
		}
		if !self.factor.is_finite() || self.factor < 1.0 {
			return Err(format!("factor must be at least 1.0, got {}", self.factor));
		}
		if self.max_delay < self.initial_delay {
			return Err("max_delay must not be smaller than initial_delay".to_string());
		}
		Ok(())
	}
}
