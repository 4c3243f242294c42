use alloy::{json_abi::Function, json_abi::JsonAbi, primitives::Address};
use std::{fmt, sync::Arc};

/// A contract address paired with its parsed ABI.
///
/// Cheap to clone; the ABI is shared.
#[derive(Debug, Clone)]
pub struct ContractHandle {
	pub address: Address,
	pub abi: Arc<JsonAbi>,
}

impl ContractHandle {
	pub fn new(address: Address, abi: Arc<JsonAbi>) -> Self {
		Self { address, abi }
	}

	/// First function with the given name. Overloads beyond the first are not addressable by name.
	pub fn function(&self, name: &str) -> Option<&Function> {
		self.abi.function(name).and_then(|overloads| overloads.first())
	}
}

/// Something that names a contract or account: a raw address or an alias
/// still to be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
	Address(Address),
	Alias(String),
}

impl From<Address> for Target {
	fn from(address: Address) -> Self {
		Self::Address(address)
	}
}

impl From<&str> for Target {
	fn from(alias: &str) -> Self {
		Self::Alias(alias.to_string())
	}
}

impl From<String> for Target {
	fn from(alias: String) -> Self {
		Self::Alias(alias)
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Address(address) => write!(f, "{}", address),
			Self::Alias(alias) => write!(f, "{}", alias),
		}
	}
}
