use alloy::primitives::{Address, B256, U256, U64};
use serde::{Deserialize, Serialize};

/// The fields of `eth_getTransactionReceipt` this crate reads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
	pub transaction_hash: B256,
	#[serde(default)]
	pub block_hash: Option<B256>,
	#[serde(default)]
	pub block_number: Option<U64>,
	#[serde(default)]
	pub gas_used: Option<U256>,
	#[serde(default)]
	pub contract_address: Option<Address>,
	/// `0x1` on success, `0x0` on revert. Absent before Byzantium.
	#[serde(default)]
	pub status: Option<U64>,
}

impl TransactionReceipt {
	pub fn block_number(&self) -> Option<u64> {
		self.block_number.map(|n| n.to::<u64>())
	}

	/// False only when the node reports a reverted transaction
	pub fn succeeded(&self) -> bool {
		self.status.map(|s| s == U64::from(1)).unwrap_or(true)
	}
}
