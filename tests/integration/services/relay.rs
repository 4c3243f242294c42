use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use ethconn::{
	services::{
		relay::{RelayClient, RelayError},
		retry::{RetryPolicy, RetryingInvoker},
	},
	utils::tests::builders::config::fast_retry_policy,
};

fn relay_client(server: &Server) -> RelayClient {
	RelayClient::new(
		reqwest::Client::new(),
		&server.url(),
		RetryingInvoker::new(fast_retry_policy()),
	)
}

#[tokio::test]
async fn test_relay_returns_tx_hash() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/relay")
		.match_body(Matcher::Json(json!({
			"address": "0x408e41876cCCDC0F92210600ef50372656052a38",
			"fnName": "mint",
			"data": ["0a0b", "ff"]
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"txHash":"0xabc123"}"#)
		.expect(1)
		.create_async()
		.await;

	let hash = relay_client(&server)
		.relay(
			&CancellationToken::new(),
			"0x408e41876cCCDC0F92210600ef50372656052a38",
			"mint",
			&[vec![0x0a, 0x0b], vec![0xff]],
		)
		.await
		.unwrap();

	assert_eq!(hash, "0xabc123");
	mock.assert_async().await;
}

#[tokio::test]
async fn test_rejection_is_not_retried() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/relay")
		.with_status(400)
		.with_body(r#"{"error":"nonce too low"}"#)
		.expect(1)
		.create_async()
		.await;

	let error = relay_client(&server)
		.relay(&CancellationToken::new(), "0x01", "mint", &[])
		.await
		.unwrap_err();

	assert!(matches!(error, RelayError::Rejected { status: 400, .. }));
	assert_eq!(error.rejection(), Some("nonce too low"));
	mock.assert_async().await;
}

#[tokio::test]
async fn test_unavailable_relay_is_retried() {
	let mut server = Server::new_async().await;
	let unavailable = server
		.mock("POST", "/relay")
		.with_status(503)
		.with_body("upstream unavailable")
		.expect_at_least(1)
		.create_async()
		.await;

	let client = RelayClient::new(
		reqwest::Client::new(),
		&server.url(),
		RetryingInvoker::new(RetryPolicy {
			initial_delay: Duration::from_millis(200),
			max_delay: Duration::from_millis(200),
			..RetryPolicy::default()
		}),
	);
	let cancel = CancellationToken::new();

	let relay = tokio::spawn({
		let cancel = cancel.clone();
		async move { client.relay(&cancel, "0x01", "mint", &[]).await }
	});

	// Wait for the first failed attempt, then bring the relay back
	tokio::time::timeout(Duration::from_secs(5), async {
		while !unavailable.matched_async().await {
			tokio::time::sleep(Duration::from_millis(5)).await;
		}
	})
	.await
	.unwrap();
	unavailable.remove_async().await;

	let recovered = server
		.mock("POST", "/relay")
		.with_status(200)
		.with_body(r#"{"txHash":"0xfeed"}"#)
		.create_async()
		.await;

	let hash = tokio::time::timeout(Duration::from_secs(5), relay)
		.await
		.unwrap()
		.unwrap()
		.unwrap();
	assert_eq!(hash, "0xfeed");
	recovered.assert_async().await;
}

#[tokio::test]
async fn test_cancelled_relay() {
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("POST", "/relay")
		.with_status(503)
		.create_async()
		.await;

	let client = RelayClient::new(
		reqwest::Client::new(),
		&server.url(),
		RetryingInvoker::new(RetryPolicy {
			initial_delay: Duration::from_secs(60),
			..RetryPolicy::default()
		}),
	);

	let cancel = CancellationToken::new();
	let canceller = cancel.clone();
	tokio::spawn(async move {
		tokio::time::sleep(Duration::from_millis(50)).await;
		canceller.cancel();
	});

	let error = tokio::time::timeout(
		Duration::from_secs(5),
		client.relay(&cancel, "0x01", "mint", &[]),
	)
	.await
	.unwrap()
	.unwrap_err();
	assert!(matches!(error, RelayError::Cancelled(_)));
}
