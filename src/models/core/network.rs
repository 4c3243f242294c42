use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::normalize_string;

/// ENS registry deployed at the same address on every network that has one
pub const ENS_REGISTRY: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// Identity of the chain a connection talks to.
///
/// Discovered once from the node (`net_version`) when connecting and never
/// changed afterwards. Selects the built-in address table, the block
/// explorer and the ENS registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkIdentity {
	Mainnet,
	Ropsten,
	Kovan,
	Sepolia,
	/// Development chain (1337 or 31337)
	Local(u64),
	Unknown(u64),
}

impl NetworkIdentity {
	pub fn from_network_id(id: u64) -> Self {
		match id {
			1 => Self::Mainnet,
			3 => Self::Ropsten,
			42 => Self::Kovan,
			11_155_111 => Self::Sepolia,
			1337 | 31337 => Self::Local(id),
			other => Self::Unknown(other),
		}
	}

	/// Parses a network name as used in configuration and hosted endpoint URLs
	pub fn from_name(name: &str) -> Option<Self> {
		match normalize_string(name).as_str() {
			"mainnet" => Some(Self::Mainnet),
			"ropsten" => Some(Self::Ropsten),
			"kovan" => Some(Self::Kovan),
			"sepolia" => Some(Self::Sepolia),
			"local" => Some(Self::Local(1337)),
			_ => None,
		}
	}

	pub fn network_id(&self) -> u64 {
		match self {
			Self::Mainnet => 1,
			Self::Ropsten => 3,
			Self::Kovan => 42,
			Self::Sepolia => 11_155_111,
			Self::Local(id) | Self::Unknown(id) => *id,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::Mainnet => "mainnet",
			Self::Ropsten => "ropsten",
			Self::Kovan => "kovan",
			Self::Sepolia => "sepolia",
			Self::Local(_) => "local",
			Self::Unknown(_) => "unknown",
		}
	}

	/// Etherscan API subdomain, `None` when the explorer does not index this network
	pub fn explorer_api_subdomain(&self) -> Option<&'static str> {
		match self {
			Self::Mainnet => Some("api"),
			Self::Ropsten => Some("api-ropsten"),
			Self::Kovan => Some("api-kovan"),
			Self::Sepolia => Some("api-sepolia"),
			Self::Local(_) | Self::Unknown(_) => None,
		}
	}

	/// Base of the explorer page showing a transaction, ending with `/tx/`
	pub fn explorer_tx_url_base(&self) -> Option<&'static str> {
		match self {
			Self::Mainnet => Some("https://etherscan.io/tx/"),
			Self::Ropsten => Some("https://ropsten.etherscan.io/tx/"),
			Self::Kovan => Some("https://kovan.etherscan.io/tx/"),
			Self::Sepolia => Some("https://sepolia.etherscan.io/tx/"),
			Self::Local(_) | Self::Unknown(_) => None,
		}
	}

	pub fn ens_registry(&self) -> Option<Address> {
		match self {
			Self::Mainnet | Self::Ropsten | Self::Sepolia => Some(ENS_REGISTRY),
			_ => None,
		}
	}

	/// Whether Infura serves this network
	fn is_hosted(&self) -> bool {
		matches!(
			self,
			Self::Mainnet | Self::Ropsten | Self::Kovan | Self::Sepolia
		)
	}

	pub fn infura_http_url(&self, project_id: &str) -> Option<String> {
		self.is_hosted()
			.then(|| format!("https://{}.infura.io/v3/{}", self.name(), project_id))
	}

	pub fn infura_ws_url(&self, project_id: &str) -> Option<String> {
		self.is_hosted()
			.then(|| format!("wss://{}.infura.io/ws/v3/{}", self.name(), project_id))
	}

	/// Hosted relay/RPC endpoint, with an optional `tag` query parameter
	pub fn mercury_url(&self, tag: Option<&str>) -> Option<String> {
		let suffix = match self {
			Self::Mainnet => "",
			Self::Kovan => "-kovan",
			Self::Ropsten => "-ropsten",
			_ => return None,
		};
		let query = tag
			.filter(|t| !t.is_empty())
			.map(|t| format!("?tag={}", t))
			.unwrap_or_default();
		Some(format!(
			"https://ren-mercury.herokuapp.com/eth{}{}",
			suffix, query
		))
	}
}

impl fmt::Display for NetworkIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Local(id) | Self::Unknown(id) => write!(f, "{} ({})", self.name(), id),
			_ => write!(f, "{}", self.name()),
		}
	}
}
