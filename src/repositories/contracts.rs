//! Local table of contract interfaces.
//!
//! Maps contract addresses to a kind (`ERC20`, ...) and kinds to ABI JSON.
//! ABIs fetched from a block explorer are cached per address so the remote
//! lookup happens at most once per contract.

use alloy::{json_abi::JsonAbi, primitives::Address};
use std::{
	collections::HashMap,
	sync::{Arc, PoisonError, RwLock},
};

use crate::{
	models::NetworkIdentity,
	repositories::{
		defaults::{self, ERC20_ABI, ERC20_KIND},
		error::RepositoryError,
	},
};

#[derive(Debug, Default)]
struct Tables {
	kinds: HashMap<Address, String>,
	abis: HashMap<String, Arc<str>>,
	fetched: HashMap<Address, Arc<str>>,
}

/// Shared contract table; clones see each other's writes
#[derive(Clone, Debug, Default)]
pub struct ContractRepository {
	tables: Arc<RwLock<Tables>>,
}

impl ContractRepository {
	/// A table that only knows the ERC20 interface
	pub fn new() -> Self {
		let tables = Tables {
			abis: HashMap::from([(ERC20_KIND.to_string(), Arc::from(ERC20_ABI))]),
			..Tables::default()
		};
		Self {
			tables: Arc::new(RwLock::new(tables)),
		}
	}

	/// Registers every built-in token of `network` as an ERC20 contract
	pub fn for_network(network: NetworkIdentity) -> Self {
		let repository = Self::new();
		{
			let mut tables = repository.write_tables();
			for (name, address) in defaults::addresses_for(network) {
				if defaults::TOKEN_ALIASES.contains(name) {
					tables.kinds.insert(*address, ERC20_KIND.to_string());
				}
			}
		}
		repository
	}

	fn read_tables(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
		self.tables.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write_tables(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
		self.tables.write().unwrap_or_else(PoisonError::into_inner)
	}

	/// Kind registered for `address`
	pub fn kind_of(&self, address: &Address) -> Option<String> {
		self.read_tables().kinds.get(address).cloned()
	}

	pub fn register_kind(&self, address: Address, kind: impl Into<String>) {
		self.write_tables().kinds.insert(address, kind.into());
	}

	/// Stores the ABI of a contract kind after checking it parses
	pub fn insert_abi(&self, kind: impl Into<String>, abi_json: &str) -> Result<(), RepositoryError> {
		let kind = kind.into();
		parse_abi(abi_json).map_err(|e| {
			RepositoryError::validation_error(
				"Invalid ABI",
				Some(Box::new(e)),
				Some(HashMap::from([("kind".to_string(), kind.clone())])),
			)
		})?;
		self.write_tables().abis.insert(kind, Arc::from(abi_json));
		Ok(())
	}

	/// Remembers an ABI fetched for a single address
	pub fn cache_abi(&self, address: Address, abi_json: &str) {
		self.write_tables()
			.fetched
			.insert(address, Arc::from(abi_json));
	}

	/// ABI JSON known locally for `address`: its kind's ABI, else a cached fetch
	pub fn abi_for(&self, address: &Address) -> Option<Arc<str>> {
		let tables = self.read_tables();
		tables
			.kinds
			.get(address)
			.and_then(|kind| tables.abis.get(kind))
			.or_else(|| tables.fetched.get(address))
			.cloned()
	}

	/// ABI JSON registered for `kind`
	pub fn abi_of_kind(&self, kind: &str) -> Option<Arc<str>> {
		self.read_tables().abis.get(kind).cloned()
	}
}

/// Parses ABI JSON
pub fn parse_abi(abi_json: &str) -> Result<JsonAbi, serde_json::Error> {
	serde_json::from_str(abi_json)
}
