//! Canned node responses and encoded values.

use alloy::{
	dyn_abi::DynSolValue,
	primitives::{Bytes, U256},
};
use mockito::{Matcher, Mock, Server};
use serde_json::json;

/// Answers the `net_version` probe sent when an HTTP transport connects
pub fn create_http_valid_server_mock_network_response(server: &mut Server) -> Mock {
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "net_version"})))
		.with_header("content-type", "application/json")
		.with_status(200)
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":"1"}"#)
		.create()
}

/// Answers `method` with `result`
pub fn create_rpc_result_mock(
	server: &mut Server,
	method: &str,
	result: serde_json::Value,
) -> Mock {
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": method })))
		.with_header("content-type", "application/json")
		.with_status(200)
		.with_body(json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string())
		.create()
}

/// ABI encoding of a single `uint256`
pub fn encode_uint(value: u64) -> Bytes {
	Bytes::from(DynSolValue::Uint(U256::from(value), 256).abi_encode())
}

/// ABI encoding of a single `string` return value
pub fn encode_string(value: &str) -> Bytes {
	Bytes::from(DynSolValue::Tuple(vec![DynSolValue::String(value.to_string())]).abi_encode_params())
}
