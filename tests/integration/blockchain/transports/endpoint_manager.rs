use mockito::{Matcher, Server};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde_json::json;

use ethconn::services::blockchain::{EndpointManager, TransportError};

use crate::integration::mocks::ProbeTransport;

// Nothing listens on port 1, so connecting fails immediately
const UNREACHABLE: &str = "http://127.0.0.1:1";
const BLOCK_NUMBER: &str = r#"{"jsonrpc":"2.0","id":1,"result":"0x10d4f"}"#;

fn plain_client() -> ClientWithMiddleware {
	ClientBuilder::new(reqwest::Client::new()).build()
}

#[tokio::test]
async fn test_rotate_to_first_reachable_fallback() {
	let mut fallback = Server::new_async().await;
	let probe = fallback.mock("GET", "/").with_status(200).create_async().await;

	let manager = EndpointManager::new(
		plain_client(),
		UNREACHABLE,
		vec![fallback.url(), "http://127.0.0.1:2".to_string()],
	);

	let new_url = manager.try_rotate_url(&ProbeTransport::new()).await.unwrap();
	assert_eq!(new_url, fallback.url());
	assert_eq!(*manager.active_url.read().await, fallback.url());
	probe.assert_async().await;
}

#[tokio::test]
async fn test_request_body_and_result() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(
			json!({"method": "eth_blockNumber", "params": []}),
		))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(BLOCK_NUMBER)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), &server.url(), vec![]);
	let response = manager
		.send_raw_request(&ProbeTransport::new(), "eth_blockNumber", Some(json!([])))
		.await
		.unwrap();

	assert_eq!(response["result"], "0x10d4f");
	mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limited_endpoint_is_rotated_out() {
	let mut primary = Server::new_async().await;
	let mut fallback = Server::new_async().await;

	let limited = primary
		.mock("POST", "/")
		.with_status(429)
		.with_body("Too Many Requests")
		.expect(1)
		.create_async()
		.await;
	fallback.mock("GET", "/").with_status(200).create_async().await;
	let served = fallback
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(BLOCK_NUMBER)
		.expect(1)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), &primary.url(), vec![fallback.url()]);
	let response = manager
		.send_raw_request(&ProbeTransport::new(), "eth_blockNumber", Some(json!([])))
		.await
		.unwrap();

	assert_eq!(response["result"], "0x10d4f");
	assert_eq!(*manager.active_url.read().await, fallback.url());
	limited.assert_async().await;
	served.assert_async().await;
}

#[tokio::test]
async fn test_http_errors_are_reported_with_status_and_body() {
	for (status, body) in [(429, "Too Many Requests"), (400, "Bad Request")] {
		let mut server = Server::new_async().await;
		let mock = server
			.mock("POST", "/")
			.with_status(status)
			.with_body(body)
			.expect(1)
			.create_async()
			.await;

		let manager = EndpointManager::new(plain_client(), &server.url(), vec![]);
		let error = manager
			.send_raw_request(&ProbeTransport::new(), "eth_call", Some(json!([])))
			.await
			.unwrap_err();

		match error {
			TransportError::Http {
				status_code,
				url,
				body: response_body,
				..
			} => {
				assert_eq!(status_code, status as u16);
				assert_eq!(url, server.url());
				assert_eq!(response_body, body);
			}
			other => panic!("expected HTTP error, got {:?}", other),
		}
		mock.assert_async().await;
	}
}

#[tokio::test]
async fn test_rotation_failures() {
	let server = Server::new_async().await;

	// No fallbacks at all, or only the active URL again
	for fallbacks in [vec![], vec![server.url(), server.url()]] {
		let manager = EndpointManager::new(plain_client(), &server.url(), fallbacks.clone());
		match manager.try_rotate_url(&ProbeTransport::new()).await {
			Err(TransportError::UrlRotation(ctx)) => {
				assert!(ctx.to_string().contains("No fallback URLs available"));
			}
			other => panic!("expected rotation error, got {:?}", other),
		}
		assert_eq!(*manager.active_url.read().await, server.url());
		assert_eq!(*manager.fallback_urls.read().await, fallbacks);
	}

	// Unreachable fallback is kept for a later attempt
	let manager = EndpointManager::new(plain_client(), &server.url(), vec![UNREACHABLE.to_string()]);
	match manager.try_rotate_url(&ProbeTransport::new()).await {
		Err(TransportError::UrlRotation(ctx)) => {
			assert!(ctx.to_string().contains("Failed to connect to new URL"));
		}
		other => panic!("expected rotation error, got {:?}", other),
	}
	assert_eq!(*manager.active_url.read().await, server.url());
	assert_eq!(
		*manager.fallback_urls.read().await,
		vec![UNREACHABLE.to_string()]
	);
}

#[tokio::test]
async fn test_rotation_refused_by_transport() {
	let primary = Server::new_async().await;
	let mut fallback = Server::new_async().await;
	fallback.mock("GET", "/").with_status(200).create_async().await;

	let manager = EndpointManager::new(plain_client(), &primary.url(), vec![fallback.url()]);
	match manager.try_rotate_url(&ProbeTransport::refusing_updates()).await {
		Err(TransportError::UrlRotation(ctx)) => {
			assert!(ctx
				.to_string()
				.contains("Failed to update transport client with new URL"));
		}
		other => panic!("expected rotation error, got {:?}", other),
	}
	assert_eq!(*manager.active_url.read().await, primary.url());
}

#[tokio::test]
async fn test_network_errors() {
	let mut fallback = Server::new_async().await;
	fallback.mock("GET", "/").with_status(200).create_async().await;
	let served = fallback
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(BLOCK_NUMBER)
		.expect(1)
		.create_async()
		.await;

	// Unreachable primary with a working fallback
	let manager = EndpointManager::new(plain_client(), UNREACHABLE, vec![fallback.url()]);
	let response = manager
		.send_raw_request(&ProbeTransport::new(), "eth_blockNumber", Some(json!([])))
		.await
		.unwrap();
	assert_eq!(response["result"], "0x10d4f");
	assert_eq!(*manager.active_url.read().await, fallback.url());
	served.assert_async().await;

	// Nothing reachable
	let manager = EndpointManager::new(
		plain_client(),
		UNREACHABLE,
		vec!["http://127.0.0.1:2".to_string()],
	);
	let error = manager
		.send_raw_request(&ProbeTransport::new(), "eth_blockNumber", Some(json!([])))
		.await
		.unwrap_err();
	assert!(matches!(error, TransportError::Network(_)));
	assert_eq!(*manager.active_url.read().await, UNREACHABLE);
}

#[tokio::test]
async fn test_malformed_response() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x1"#)
		.expect(1)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), &server.url(), vec![]);
	let error = manager
		.send_raw_request(&ProbeTransport::new(), "eth_blockNumber", Some(json!([])))
		.await
		.unwrap_err();
	assert!(matches!(error, TransportError::ResponseParse(_)));
	mock.assert_async().await;
}
