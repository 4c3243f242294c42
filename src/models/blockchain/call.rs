use alloy::primitives::{Address, Bytes, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gas price tier requested from the signing collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxExecutionSpeed {
	Slow,
	#[default]
	Standard,
	Fast,
	Fastest,
}

impl fmt::Display for TxExecutionSpeed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Slow => "slow",
			Self::Standard => "standard",
			Self::Fast => "fast",
			Self::Fastest => "fastest",
		};
		write!(f, "{}", name)
	}
}

/// A packed contract call.
///
/// Calldata never depends on chain state, so the same value is reused
/// unchanged by every retry of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
	pub to: Address,
	pub function: String,
	pub selector: Selector,
	/// ABI-encoded arguments, without the selector
	pub arguments: Bytes,
}

impl PendingCall {
	pub fn new(to: Address, function: impl Into<String>, selector: Selector, arguments: Bytes) -> Self {
		Self {
			to,
			function: function.into(),
			selector,
			arguments,
		}
	}

	/// Selector followed by the encoded arguments
	pub fn calldata(&self) -> Bytes {
		let mut data = Vec::with_capacity(4 + self.arguments.len());
		data.extend_from_slice(self.selector.as_slice());
		data.extend_from_slice(&self.arguments);
		data.into()
	}
}
