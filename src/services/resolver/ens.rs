//! ENS name lookups through the node.

use alloy::primitives::{fixed_bytes, keccak256, Address, Bytes, FixedBytes, B256};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tracing::instrument;

use crate::services::{blockchain::EvmClientTrait, resolver::ResolverError};

/// `resolver(bytes32)` on the ENS registry
pub const RESOLVER_SELECTOR: FixedBytes<4> = fixed_bytes!("0178b8bf");

/// `addr(bytes32)` on a public resolver
pub const ADDR_SELECTOR: FixedBytes<4> = fixed_bytes!("3b3b57de");

/// Resolves a dotted name to an address
#[async_trait]
pub trait NameService: Send + Sync {
	async fn resolve_name(&self, name: &str) -> Result<Address, ResolverError>;
}

/// EIP-137 namehash of `name`. Labels are lowercased.
pub fn namehash(name: &str) -> B256 {
	if name.is_empty() {
		return B256::ZERO;
	}
	name.rsplit('.').fold(B256::ZERO, |node, label| {
		let label_hash = keccak256(label.to_lowercase().as_bytes());
		let mut preimage = [0u8; 64];
		preimage[..32].copy_from_slice(node.as_slice());
		preimage[32..].copy_from_slice(label_hash.as_slice());
		keccak256(preimage)
	})
}

/// [`NameService`] backed by the ENS registry of the connected network.
///
/// Each lookup is two `eth_call`s: the registry for the name's resolver,
/// then the resolver for the address. Neither is retried.
pub struct EnsNameService<C: EvmClientTrait> {
	client: Arc<C>,
	registry: Option<Address>,
}

impl<C: EvmClientTrait> Clone for EnsNameService<C> {
	fn clone(&self) -> Self {
		Self {
			client: self.client.clone(),
			registry: self.registry,
		}
	}
}

impl<C: EvmClientTrait> EnsNameService<C> {
	/// `registry` is `None` on networks without ENS; every lookup then fails
	/// with [`ResolverError::Unsupported`].
	pub fn new(client: Arc<C>, registry: Option<Address>) -> Self {
		Self { client, registry }
	}

	async fn read_address(
		&self,
		contract: Address,
		selector: FixedBytes<4>,
		node: B256,
		name: &str,
	) -> Result<Address, ResolverError> {
		let metadata = || {
			Some(HashMap::from([
				("name".to_string(), name.to_string()),
				("contract".to_string(), contract.to_string()),
			]))
		};

		let mut calldata = Vec::with_capacity(36);
		calldata.extend_from_slice(selector.as_slice());
		calldata.extend_from_slice(node.as_slice());

		let output = self
			.client
			.call(contract, Bytes::from(calldata))
			.await
			.map_err(|e| {
				ResolverError::lookup_failed("ENS call failed", Some(e.into()), metadata())
			})?;

		if output.len() < 32 {
			return Err(ResolverError::not_found(
				format!("no ENS record for {}", name),
				None,
				metadata(),
			));
		}
		Ok(Address::from_slice(&output[12..32]))
	}
}

#[async_trait]
impl<C: EvmClientTrait> NameService for EnsNameService<C> {
	#[instrument(skip(self))]
	async fn resolve_name(&self, name: &str) -> Result<Address, ResolverError> {
		let registry = self.registry.ok_or_else(|| {
			ResolverError::unsupported("ENS does not exist on the current network", None, None)
		})?;

		let node = namehash(name);
		let resolver = self
			.read_address(registry, RESOLVER_SELECTOR, node, name)
			.await?;
		if resolver.is_zero() {
			return Err(ResolverError::not_found(
				format!("no resolver set for {}", name),
				None,
				None,
			));
		}

		let address = self.read_address(resolver, ADDR_SELECTOR, node, name).await?;
		if address.is_zero() {
			return Err(ResolverError::not_found(
				format!("no address set for {}", name),
				None,
				None,
			));
		}
		Ok(address)
	}
}
