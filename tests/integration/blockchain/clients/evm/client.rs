use alloy::primitives::{address, b256, Bytes, U256};
use mockall::predicate;
use serde_json::{json, Value};

use ethconn::services::blockchain::{EvmClient, EvmClientTrait, TransportError};

use crate::integration::mocks::MockEthTransportClient;

fn envelope(result: Value) -> Value {
	json!({"jsonrpc": "2.0", "id": 1, "result": result})
}

#[tokio::test]
async fn test_get_network_id() {
	let mut transport = MockEthTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(predicate::eq("net_version"), predicate::always())
		.times(1)
		.returning(|_, _| Ok(envelope(json!("3"))));

	let client = EvmClient::new_with_transport(transport);
	assert_eq!(client.get_network_id().await.unwrap(), 3);
}

#[tokio::test]
async fn test_get_balance() {
	let who = address!("408e41876cCCDC0F92210600ef50372656052a38");
	let mut transport = MockEthTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(
			predicate::eq("eth_getBalance"),
			predicate::function(move |params: &Option<Vec<Value>>| {
				let params = params.as_ref().unwrap();
				params[0] == json!(who) && params[1] == json!("latest")
			}),
		)
		.times(1)
		.returning(|_, _| Ok(envelope(json!("0xde0b6b3a7640000"))));

	let client = EvmClient::new_with_transport(transport);
	let balance = client.get_balance(who).await.unwrap();
	assert_eq!(balance, U256::from(1_000_000_000_000_000_000u64));
}

#[tokio::test]
async fn test_call_returns_output_bytes() {
	let mut transport = MockEthTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(
			predicate::eq("eth_call"),
			predicate::function(|params: &Option<Vec<Value>>| {
				params.as_ref().unwrap()[0]["data"] == json!("0x313ce567")
			}),
		)
		.returning(|_, _| {
			Ok(envelope(json!(
				"0x0000000000000000000000000000000000000000000000000000000000000012"
			)))
		});

	let client = EvmClient::new_with_transport(transport);
	let output = client
		.call(
			address!("408e41876cCCDC0F92210600ef50372656052a38"),
			Bytes::from(vec![0x31, 0x3c, 0xe5, 0x67]),
		)
		.await
		.unwrap();
	assert_eq!(output.len(), 32);
	assert_eq!(output[31], 0x12);
}

#[tokio::test]
async fn test_call_surfaces_rpc_error() {
	let mut transport = MockEthTransportClient::new();
	transport.expect_send_raw_request().returning(|_, _| {
		Ok(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"error": {"code": -32000, "message": "execution reverted"}
		}))
	});

	let client = EvmClient::new_with_transport(transport);
	let error = client
		.call(address!("408e41876cCCDC0F92210600ef50372656052a38"), Bytes::new())
		.await
		.unwrap_err();
	assert!(format!("{:#}", error).contains("execution reverted"));
}

#[tokio::test]
async fn test_transport_error_is_propagated() {
	let mut transport = MockEthTransportClient::new();
	transport.expect_send_raw_request().returning(|_, _| {
		Err(TransportError::network("connection refused", None, None))
	});

	let client = EvmClient::new_with_transport(transport);
	let error = client.get_latest_block_number().await.unwrap_err();
	assert!(error.to_string().contains("eth_getBlockByNumber request failed"));
	assert!(error.downcast_ref::<TransportError>().is_some());
}

#[tokio::test]
async fn test_transaction_block_number_pending_and_mined() {
	let hash = b256!("88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b");
	let mut transport = MockEthTransportClient::new();
	let mut seq = mockall::Sequence::new();
	transport
		.expect_send_raw_request()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_, _| Ok(envelope(json!({"hash": "0x88", "blockNumber": null}))));
	transport
		.expect_send_raw_request()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_, _| Ok(envelope(json!({"hash": "0x88", "blockNumber": "0x5daf3b"}))));

	let client = EvmClient::new_with_transport(transport);
	assert_eq!(client.get_transaction_block_number(hash).await.unwrap(), None);
	assert_eq!(
		client.get_transaction_block_number(hash).await.unwrap(),
		Some(6139707)
	);
}

#[tokio::test]
async fn test_latest_block_number() {
	let mut transport = MockEthTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(predicate::eq("eth_getBlockByNumber"), predicate::always())
		.returning(|_, _| Ok(envelope(json!({"number": "0x10"}))));

	let client = EvmClient::new_with_transport(transport);
	assert_eq!(client.get_latest_block_number().await.unwrap(), Some(16));
}

#[tokio::test]
async fn test_transaction_receipt() {
	let hash = b256!("88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b");
	let mut transport = MockEthTransportClient::new();
	let mut seq = mockall::Sequence::new();
	transport
		.expect_send_raw_request()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_, _| Ok(envelope(Value::Null)));
	transport
		.expect_send_raw_request()
		.times(1)
		.in_sequence(&mut seq)
		.returning(move |_, _| {
			Ok(envelope(json!({
				"transactionHash": hash,
				"blockNumber": "0x1b4",
				"status": "0x1"
			})))
		});

	let client = EvmClient::new_with_transport(transport);
	assert!(client.get_transaction_receipt(hash).await.unwrap().is_none());

	let receipt = client.get_transaction_receipt(hash).await.unwrap().unwrap();
	assert_eq!(receipt.transaction_hash, hash);
	assert_eq!(receipt.block_number(), Some(436));
	assert!(receipt.succeeded());
}
