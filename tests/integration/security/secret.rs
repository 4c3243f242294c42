use std::{env, fs, sync::Mutex};
use tempfile::TempDir;
use zeroize::Zeroize;

use ethconn::{
	models::{ConfigLoader, ConnectionConfig, NetworkIdentity, SecretString, SecretValue, TransportConfig},
	services::connection::Connection,
};

use crate::integration::mocks::create_http_valid_server_mock_network_response;

// Tests in this file change process environment variables
static TEST_LOCK: Mutex<()> = Mutex::new(());

#[tokio::test]
#[allow(clippy::await_holding_lock)]
async fn test_secret_resolution_from_config_file() {
	let _lock = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());

	let temp_dir = TempDir::new().unwrap();
	let config_path = temp_dir.path().join("connection.json");

	const RPC_URL_ENV: &str = "ETHCONN_IT_RPC_URL";
	const API_KEY_ENV: &str = "ETHCONN_IT_EXPLORER_KEY";
	env::set_var(RPC_URL_ENV, "https://node.example");
	env::set_var(API_KEY_ENV, "explorer-key");

	let config = serde_json::json!({
		"transport": {
			"type": "http",
			"url": {"type": "environment", "value": RPC_URL_ENV},
			"fallback_urls": [{"type": "plain", "value": "https://fallback.example"}]
		},
		"network": "mainnet",
		"explorer_api_key": {"type": "environment", "value": API_KEY_ENV}
	});
	fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

	let loaded = ConnectionConfig::load_from_path(&config_path).await.unwrap();

	let urls: Vec<&str> = loaded.transport.urls().iter().map(|u| u.as_str()).collect();
	assert_eq!(urls, vec!["https://node.example", "https://fallback.example"]);
	assert_eq!(
		loaded.explorer_api_key,
		Some(SecretValue::Plain(SecretString::new("explorer-key".to_string())))
	);
	assert_eq!(loaded.network, Some(NetworkIdentity::Mainnet));

	env::remove_var(RPC_URL_ENV);
	env::remove_var(API_KEY_ENV);
}

#[tokio::test]
#[allow(clippy::await_holding_lock)]
async fn test_missing_environment_secret() {
	let _lock = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());

	let temp_dir = TempDir::new().unwrap();
	let config_path = temp_dir.path().join("connection.json");
	fs::write(
		&config_path,
		r#"{"transport": {"type": "http", "url": {"type": "environment", "value": "ETHCONN_IT_UNSET"}}}"#,
	)
	.unwrap();

	env::remove_var("ETHCONN_IT_UNSET");
	let result = ConnectionConfig::load_from_path(&config_path).await;
	assert!(result.is_err());
}

#[tokio::test]
#[allow(clippy::await_holding_lock)]
async fn test_connect_with_environment_url() {
	let _lock = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());

	let mut server = mockito::Server::new_async().await;
	let mock = create_http_valid_server_mock_network_response(&mut server);

	const RPC_URL_ENV: &str = "ETHCONN_IT_CONNECT_URL";
	env::set_var(RPC_URL_ENV, server.url());

	let config = ConnectionConfig {
		transport: TransportConfig::Http {
			url: SecretValue::Environment(RPC_URL_ENV.to_string()),
			fallback_urls: vec![],
		},
		..ConnectionConfig::http("http://unused")
	}
	.with_network(NetworkIdentity::Mainnet);

	let connection = Connection::connect(&config).await.unwrap();
	assert_eq!(connection.network(), NetworkIdentity::Mainnet);
	assert!(mock.matched());

	env::remove_var(RPC_URL_ENV);
}

#[tokio::test]
#[allow(clippy::await_holding_lock)]
async fn test_secret_zeroization() {
	let _lock = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());

	let mut secret = SecretValue::Plain(SecretString::new("sensitive_data".to_string()));
	let resolved = secret.resolve().await.unwrap();
	assert_eq!(resolved.as_str(), "sensitive_data");

	secret.zeroize();
	assert!(secret.is_empty());

	// The resolved copy is independent of the zeroized original
	assert_eq!(resolved.as_str(), "sensitive_data");
}

#[test]
fn test_secret_display_never_prints_plain_value() {
	let secret = SecretValue::Plain(SecretString::new("hunter2".to_string()));
	let config = ConnectionConfig::http("https://node.example")
		.with_explorer(secret.clone(), None);

	assert!(!format!("{}", secret).contains("hunter2"));
	assert_eq!(
		config.explorer_api_key.as_ref().map(|k| k.to_string()),
		Some("<redacted>".to_string())
	);
}
