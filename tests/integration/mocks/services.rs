//! Mock implementations of the name service and the transaction submitter.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use mockall::mock;
use tokio_util::sync::CancellationToken;

use ethconn::{
	models::{PendingCall, TxExecutionSpeed},
	services::{
		contract::TransactionSubmitter,
		resolver::{NameService, ResolverError},
	},
};

mock! {
	pub NameService {}

	#[async_trait]
	impl NameService for NameService {
		async fn resolve_name(&self, name: &str) -> Result<Address, ResolverError>;
	}
}

mock! {
	pub TransactionSubmitter {}

	#[async_trait]
	impl TransactionSubmitter for TransactionSubmitter {
		fn address(&self) -> Address;
		async fn submit(
			&self,
			cancel: &CancellationToken,
			call: PendingCall,
			speed: TxExecutionSpeed,
		) -> Result<B256, anyhow::Error>;
	}
}
