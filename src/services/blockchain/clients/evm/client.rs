//! Ethereum JSON-RPC client over any [`BlockchainTransport`].

use alloy::primitives::{Address, Bytes, B256, U256};
use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::{collections::HashMap, str::FromStr};
use tracing::instrument;

use crate::{
	models::TransactionReceipt,
	services::blockchain::{
		client::EvmClientTrait,
		transports::{
			BlockchainTransport, EthTransport, HttpTransportClient, WsTransportClient,
		},
		BlockChainError,
	},
	utils::{
		http::RetryConfig,
		parsing::{parse_network_id, parse_quantity},
	},
};

#[derive(Clone, Debug)]
pub struct EvmClient<T: Send + Sync + Clone> {
	transport: T,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	pub fn new_with_transport(transport: T) -> Self {
		Self { transport }
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}
}

impl EvmClient<EthTransport> {
	/// Connects over HTTP, trying `endpoints` in order
	pub async fn connect_http(
		endpoints: &[String],
		retry_config: &RetryConfig,
	) -> Result<Self, BlockChainError> {
		let transport = HttpTransportClient::new(endpoints, retry_config)
			.await
			.map_err(|e| {
				BlockChainError::connection_error(
					"Failed to connect over HTTP",
					Some(e.into()),
					Some(HashMap::from([(
						"endpoints".to_string(),
						endpoints.len().to_string(),
					)])),
				)
			})?;
		Ok(Self::new_with_transport(EthTransport::Http(transport)))
	}

	pub async fn connect_ws(url: &str) -> Result<Self, BlockChainError> {
		let transport = WsTransportClient::new(url).await.map_err(|e| {
			BlockChainError::connection_error(
				"Failed to connect over WebSocket",
				Some(e.into()),
				None,
			)
		})?;
		Ok(Self::new_with_transport(EthTransport::Ws(transport)))
	}
}

/// Returns the `result` member, turning an `error` member into [`BlockChainError::RpcError`].
fn extract_result(response: Value, method: &str) -> Result<Value, BlockChainError> {
	let metadata = || Some(HashMap::from([("method".to_string(), method.to_string())]));

	if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
		let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
		let message = error
			.get("message")
			.and_then(Value::as_str)
			.unwrap_or("unknown error");
		return Err(BlockChainError::rpc_error(code, message, metadata()));
	}

	match response {
		Value::Object(mut map) => map
			.remove("result")
			.ok_or_else(|| BlockChainError::request_error("Missing 'result' field", None, metadata())),
		_ => Err(BlockChainError::request_error(
			"Response is not a JSON object",
			None,
			metadata(),
		)),
	}
}

impl<T: Send + Sync + Clone + BlockchainTransport> EvmClient<T> {
	async fn request(&self, method: &str, params: Value) -> Result<Value, anyhow::Error> {
		let response = self
			.transport
			.send_raw_request(method, Some(params))
			.await
			.with_context(|| format!("{} request failed", method))?;
		Ok(extract_result(response, method)?)
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> EvmClientTrait for EvmClient<T> {
	#[instrument(skip(self))]
	async fn get_network_id(&self) -> Result<u64, anyhow::Error> {
		let result = self.request("net_version", json!([])).await?;
		let id = result
			.as_str()
			.ok_or_else(|| anyhow::anyhow!("net_version result is not a string"))?;
		parse_network_id(id).map_err(|e| anyhow::anyhow!(e))
	}

	#[instrument(skip(self))]
	async fn get_balance(&self, address: Address) -> Result<U256, anyhow::Error> {
		let result = self
			.request("eth_getBalance", json!([address, "latest"]))
			.await?;
		let balance = result
			.as_str()
			.ok_or_else(|| anyhow::anyhow!("eth_getBalance result is not a string"))?;
		U256::from_str(balance).with_context(|| format!("Invalid balance '{}'", balance))
	}

	#[instrument(skip(self, data), fields(data_len = data.len()))]
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, anyhow::Error> {
		let result = self
			.request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
			.await?;
		let output = result
			.as_str()
			.ok_or_else(|| anyhow::anyhow!("eth_call result is not a string"))?;
		Bytes::from_str(output).with_context(|| "Failed to decode eth_call output")
	}

	#[instrument(skip(self))]
	async fn get_transaction_block_number(
		&self,
		hash: B256,
	) -> Result<Option<u64>, anyhow::Error> {
		let result = self
			.request("eth_getTransactionByHash", json!([hash]))
			.await?;
		match result.get("blockNumber").and_then(Value::as_str) {
			Some(number) => Ok(Some(parse_quantity(number).map_err(|e| anyhow::anyhow!(e))?)),
			None => Ok(None),
		}
	}

	#[instrument(skip(self))]
	async fn get_latest_block_number(&self) -> Result<Option<u64>, anyhow::Error> {
		let result = self
			.request("eth_getBlockByNumber", json!(["latest", false]))
			.await?;
		match result.get("number").and_then(Value::as_str) {
			Some(number) => Ok(Some(parse_quantity(number).map_err(|e| anyhow::anyhow!(e))?)),
			None => Ok(None),
		}
	}

	#[instrument(skip(self))]
	async fn get_transaction_receipt(
		&self,
		hash: B256,
	) -> Result<Option<TransactionReceipt>, anyhow::Error> {
		let result = self
			.request("eth_getTransactionReceipt", json!([hash]))
			.await?;
		if result.is_null() {
			return Ok(None);
		}
		Ok(Some(
			serde_json::from_value(result).with_context(|| "Failed to parse transaction receipt")?,
		))
	}
}
