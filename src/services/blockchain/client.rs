//! Read interface to an Ethereum node.

use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

use crate::models::TransactionReceipt;

/// The node queries the rest of the crate relies on.
///
/// Methods whose answer may not exist yet (a pending transaction, a block
/// the node has not seen) return `Ok(None)` instead of an error so callers
/// can poll them.
#[async_trait]
pub trait EvmClientTrait: Send + Sync {
	/// Network id reported by `net_version`
	async fn get_network_id(&self) -> Result<u64, anyhow::Error>;

	/// Balance in wei at the latest block
	async fn get_balance(&self, address: Address) -> Result<U256, anyhow::Error>;

	/// `eth_call` against the latest block; returns the raw output bytes
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, anyhow::Error>;

	/// Block that included `hash`, `None` while it is pending or unknown
	async fn get_transaction_block_number(&self, hash: B256)
		-> Result<Option<u64>, anyhow::Error>;

	/// Number of the latest block, `None` if the node returned no block
	async fn get_latest_block_number(&self) -> Result<Option<u64>, anyhow::Error>;

	async fn get_transaction_receipt(
		&self,
		hash: B256,
	) -> Result<Option<TransactionReceipt>, anyhow::Error>;
}
