use mockito::{Matcher, Server};
use serde_json::json;

use ethconn::{
	services::blockchain::{BlockchainTransport, HttpTransportClient, RotatingTransport},
	utils::RetryConfig,
};

use crate::integration::mocks::create_http_valid_server_mock_network_response;

#[tokio::test]
async fn test_client_creation() {
	let mut server = Server::new_async().await;
	let mock = create_http_valid_server_mock_network_response(&mut server);

	match HttpTransportClient::new(&[server.url()], &RetryConfig::default()).await {
		Ok(transport) => {
			let active_url = transport.get_current_url().await;
			assert_eq!(active_url, server.url());
			mock.assert();
		}
		Err(e) => panic!("Transport creation failed: {:?}", e),
	}

	match HttpTransportClient::new(&["invalid-url".to_string()], &RetryConfig::default()).await {
		Err(error) => {
			assert!(error.to_string().contains("All RPC URLs failed to connect"))
		}
		_ => panic!("Transport creation should fail"),
	}
}

#[tokio::test]
async fn test_client_creation_with_fallback() {
	let mut server = Server::new_async().await;
	let mut server2 = Server::new_async().await;

	let retry_config = RetryConfig::disabled();
	let expected_attempts = 1 + retry_config.max_retries;

	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "net_version"})))
		.with_status(500)
		.expect(expected_attempts as usize)
		.create();

	let mock2 = create_http_valid_server_mock_network_response(&mut server2);

	match HttpTransportClient::new(&[server.url(), server2.url()], &retry_config).await {
		Ok(transport) => {
			let active_url = transport.get_current_url().await;
			assert_eq!(active_url, server2.url());
			mock.assert();
			mock2.assert();
		}
		Err(e) => panic!("Transport creation failed: {:?}", e),
	}
}

#[tokio::test]
async fn test_client_update_client() {
	let mut server = Server::new_async().await;
	let server2 = Server::new_async().await;

	let mock1 = create_http_valid_server_mock_network_response(&mut server);

	let client = HttpTransportClient::new(&[server.url()], &RetryConfig::default())
		.await
		.unwrap();

	let result = client.update_client(&server2.url()).await;
	assert!(result.is_ok(), "Update to valid URL should succeed");
	assert_eq!(client.get_current_url().await, server2.url());

	let result = client.update_client("invalid-url").await;
	assert!(result.is_err(), "Update with invalid URL should fail");
	let e = result.unwrap_err();
	assert!(e.to_string().contains("Invalid URL: invalid-url"));

	mock1.assert();
}

#[tokio::test]
async fn test_client_try_connect() {
	let mut server = Server::new_async().await;
	let mut server2 = Server::new_async().await;
	let mock = create_http_valid_server_mock_network_response(&mut server);
	let mock2 = create_http_valid_server_mock_network_response(&mut server2);

	let client = HttpTransportClient::new(&[server.url()], &RetryConfig::disabled())
		.await
		.unwrap();

	let result = client.try_connect(&server2.url()).await;
	assert!(result.is_ok(), "Try connect should succeed");

	let result = client.try_connect("invalid-url").await;
	let e = result.unwrap_err();
	assert!(e.to_string().contains("Invalid URL"));

	let result = client
		.try_connect("http://non-existent-url-localhost:8545")
		.await;
	let e = result.unwrap_err();
	assert!(e.to_string().contains("Failed to connect"));

	mock.assert();
	mock2.assert();
}

#[tokio::test]
async fn test_send_raw_request() {
	let mut server = Server::new_async().await;
	let network_mock = create_http_valid_server_mock_network_response(&mut server);

	let test_mock = server
		.mock("POST", "/")
		.match_body(Matcher::Json(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "eth_getBalance",
			"params": ["0x0000000000000000000000000000000000000000", "latest"]
		})))
		.with_header("content-type", "application/json")
		.with_status(200)
		.with_body(r#"{"jsonrpc":"2.0","result":"0x2a","id":1}"#)
		.create();

	let client = HttpTransportClient::new(&[server.url()], &RetryConfig::default())
		.await
		.unwrap();

	let params = json!(["0x0000000000000000000000000000000000000000", "latest"]);
	let response = client
		.send_raw_request("eth_getBalance", Some(params))
		.await
		.unwrap();
	assert_eq!(response["result"], "0x2a");

	network_mock.assert();
	test_mock.assert();

	let no_params_mock = server
		.mock("POST", "/")
		.match_body(Matcher::Json(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "eth_blockNumber",
			"params": []
		})))
		.with_header("content-type", "application/json")
		.with_status(200)
		.with_body(r#"{"jsonrpc":"2.0","result":"0x10","id":1}"#)
		.create();

	let response = client
		.send_raw_request::<serde_json::Value>("eth_blockNumber", None)
		.await
		.unwrap();
	assert_eq!(response["result"], "0x10");
	no_params_mock.assert();
}
