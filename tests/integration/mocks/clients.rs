//! Mock implementation of the node client.
//!
//! [`MockEvmClientTrait`] stands in for a connected node so that retry,
//! resolution and decoding can be tested without network access.

use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use mockall::mock;

use ethconn::{models::TransactionReceipt, services::blockchain::EvmClientTrait};

mock! {
	/// Mock implementation of the node client trait.
	pub EvmClientTrait {}

	#[async_trait]
	impl EvmClientTrait for EvmClientTrait {
		async fn get_network_id(&self) -> Result<u64, anyhow::Error>;
		async fn get_balance(&self, address: Address) -> Result<U256, anyhow::Error>;
		async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, anyhow::Error>;
		async fn get_transaction_block_number(
			&self,
			hash: B256,
		) -> Result<Option<u64>, anyhow::Error>;
		async fn get_latest_block_number(&self) -> Result<Option<u64>, anyhow::Error>;
		async fn get_transaction_receipt(
			&self,
			hash: B256,
		) -> Result<Option<TransactionReceipt>, anyhow::Error>;
	}
}

/// A mock client on mainnet (`net_version` = 1)
pub fn mainnet_client() -> MockEvmClientTrait {
	let mut client = MockEvmClientTrait::new();
	client.expect_get_network_id().returning(|| Ok(1));
	client
}
