//! Per-network alias registry.
//!
//! Every connection owns one [`AddressBook`], seeded from the built-in table
//! of its network. Clones share the same map so an alias written through one
//! handle is seen by every reader that looks it up afterwards.

use alloy::primitives::Address;
use std::{
	collections::HashMap,
	sync::{Arc, PoisonError, RwLock},
};

use crate::{
	models::NetworkIdentity,
	repositories::{defaults, error::RepositoryError},
};

/// Interface for alias registries
pub trait AddressBookTrait: Clone + Send + Sync {
	/// Address stored under `name`. Names are case sensitive.
	fn lookup(&self, name: &str) -> Result<Address, RepositoryError>;

	/// Stores `address` under `name`, replacing any previous entry
	fn write(&self, name: &str, address: Address);

	/// Copy of every entry
	fn entries(&self) -> HashMap<String, Address>;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Shared, internally synchronised alias registry
#[derive(Clone, Debug, Default)]
pub struct AddressBook {
	network: Option<NetworkIdentity>,
	entries: Arc<RwLock<HashMap<String, Address>>>,
}

impl AddressBook {
	/// An empty book not tied to any network
	pub fn new() -> Self {
		Self::default()
	}

	/// A fresh book holding the built-in aliases of `network`
	pub fn for_network(network: NetworkIdentity) -> Self {
		let entries = defaults::addresses_for(network)
			.iter()
			.map(|(name, address)| (name.to_string(), *address))
			.collect();
		Self {
			network: Some(network),
			entries: Arc::new(RwLock::new(entries)),
		}
	}

	pub fn network(&self) -> Option<NetworkIdentity> {
		self.network
	}
}

impl FromIterator<(String, Address)> for AddressBook {
	fn from_iter<I: IntoIterator<Item = (String, Address)>>(iter: I) -> Self {
		Self {
			network: None,
			entries: Arc::new(RwLock::new(iter.into_iter().collect())),
		}
	}
}

// A poisoned lock is recovered with `PoisonError::into_inner`.
impl AddressBookTrait for AddressBook {
	fn lookup(&self, name: &str) -> Result<Address, RepositoryError> {
		let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
		entries.get(name).copied().ok_or_else(|| {
			RepositoryError::not_found(
				name,
				None,
				self.network.map(|network| {
					HashMap::from([("network".to_string(), network.name().to_string())])
				}),
			)
		})
	}

	fn write(&self, name: &str, address: Address) {
		let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
		entries.insert(name.to_string(), address);
	}

	fn entries(&self) -> HashMap<String, Address> {
		self.entries
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	fn len(&self) -> usize {
		self.entries
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.len()
	}
}
