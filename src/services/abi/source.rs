//! Contract ABI lookup: local table first, then one block-explorer request.

use alloy::primitives::Address;
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, instrument};

use crate::{
	models::{NetworkIdentity, SecretString},
	repositories::{parse_abi, ContractRepository},
	services::abi::AbiError,
};

/// Etherscan `getabi` response
#[derive(Debug, Deserialize)]
struct ExplorerEnvelope {
	#[serde(default)]
	status: Option<String>,
	#[serde(default)]
	message: Option<String>,
	result: String,
}

/// Resolves contract ABIs.
///
/// Remote answers are cached in the shared [`ContractRepository`]. The
/// explorer is asked once per call and a failure is returned as is: the ABI
/// does not change between attempts of the contract call that needs it.
#[derive(Clone, Debug)]
pub struct AbiSource {
	client: reqwest::Client,
	contracts: ContractRepository,
	api_key: Option<SecretString>,
	base_url: Option<String>,
}

impl AbiSource {
	pub fn new(
		client: reqwest::Client,
		contracts: ContractRepository,
		api_key: Option<SecretString>,
	) -> Self {
		Self {
			client,
			contracts,
			api_key,
			base_url: None,
		}
	}

	/// Sends explorer requests to `base_url` instead of `https://{subdomain}.etherscan.io`
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());
		self
	}

	pub fn contracts(&self) -> &ContractRepository {
		&self.contracts
	}

	fn explorer_url(&self, subdomain: &str) -> String {
		match &self.base_url {
			Some(base) => format!("{}/api", base.trim_end_matches('/')),
			None => format!("https://{}.etherscan.io/api", subdomain),
		}
	}

	/// ABI JSON of the contract at `address`
	#[instrument(skip(self))]
	pub async fn resolve_abi(
		&self,
		network: NetworkIdentity,
		address: Address,
	) -> Result<Arc<str>, AbiError> {
		if let Some(abi) = self.contracts.abi_for(&address) {
			return Ok(abi);
		}

		let metadata = || {
			HashMap::from([
				("network".to_string(), network.name().to_string()),
				("address".to_string(), address.to_string()),
			])
		};

		let subdomain = network.explorer_api_subdomain().ok_or_else(|| {
			AbiError::unsupported(
				format!("no block explorer for network {}", network),
				None,
				Some(metadata()),
			)
		})?;

		let address_param = address.to_string();
		let mut query = vec![
			("module", "contract"),
			("action", "getabi"),
			("address", address_param.as_str()),
		];
		if let Some(key) = &self.api_key {
			query.push(("apikey", key.as_str()));
		}

		debug!("fetching ABI from block explorer");
		let response = self
			.client
			.get(self.explorer_url(subdomain))
			.query(&query)
			.send()
			.await
			.map_err(|e| {
				AbiError::remote_failure(
					"block explorer request failed",
					Some(Box::new(e)),
					Some(metadata()),
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			let mut metadata = metadata();
			metadata.insert("status".to_string(), status.as_u16().to_string());
			return Err(AbiError::remote_failure(
				format!("block explorer returned HTTP {}", status),
				None,
				Some(metadata),
			));
		}

		let envelope: ExplorerEnvelope = response.json().await.map_err(|e| {
			AbiError::parse(
				"block explorer response is not a valid envelope",
				Some(Box::new(e)),
				Some(metadata()),
			)
		})?;

		if envelope.status.as_deref() == Some("0") {
			let mut metadata = metadata();
			metadata.insert(
				"message".to_string(),
				envelope.message.unwrap_or_default(),
			);
			return Err(AbiError::remote_failure(
				format!("block explorer refused the request: {}", envelope.result),
				None,
				Some(metadata),
			));
		}

		parse_abi(&envelope.result).map_err(|e| {
			AbiError::parse(
				"block explorer result is not an ABI",
				Some(Box::new(e)),
				Some(metadata()),
			)
		})?;

		self.contracts.cache_abi(address, &envelope.result);
		Ok(Arc::from(envelope.result))
	}
}
