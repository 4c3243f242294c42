//! A connection to one Ethereum node and everything resolved against it.

use alloy::{
	dyn_abi::DynSolValue,
	primitives::{Address, B256, U256},
};
use std::{collections::HashMap, future::Future, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::{
	models::{
		ConfigLoader, ConnectionConfig, NetworkIdentity, SecretString, Target, TransactionReceipt,
		TransportConfig,
	},
	repositories::{AddressBook, AddressBookTrait, ContractRepository, RepositoryError},
	services::{
		abi::AbiSource,
		blockchain::{EthTransport, EvmClient, EvmClientTrait},
		connection::ConnectionError,
		contract::{ContractCaller, Erc20, TransactionSubmitter},
		relay::RelayClient,
		resolver::{EnsNameService, NameResolver},
		retry::{predicates, RetryError, RetryingInvoker},
	},
	utils::{http::create_base_http_client, logging::error::BoxError},
};

/// Caller and token types of a connection over client `C`
pub type ConnectionCaller<C> = ContractCaller<C, EnsNameService<C>>;
pub type ConnectionToken<C> = Erc20<C, EnsNameService<C>>;

/// Shared handle to a node.
///
/// The network identity is discovered once when connecting. The address
/// book and the contract table are owned by the connection and shared by all
/// clones, so concurrent operations see each other's writes.
pub struct Connection<C: EvmClientTrait + 'static = EvmClient<EthTransport>> {
	client: Arc<C>,
	network: NetworkIdentity,
	address_book: AddressBook,
	contracts: ContractRepository,
	caller: ConnectionCaller<C>,
	relay: Option<RelayClient>,
	invoker: RetryingInvoker,
}

impl<C: EvmClientTrait + 'static> Clone for Connection<C> {
	fn clone(&self) -> Self {
		Self {
			client: self.client.clone(),
			network: self.network,
			address_book: self.address_book.clone(),
			contracts: self.contracts.clone(),
			caller: self.caller.clone(),
			relay: self.relay.clone(),
			invoker: self.invoker.clone(),
		}
	}
}

impl Connection {
	/// Resolves secrets, connects the configured transport and discovers the network
	#[instrument(skip(config))]
	pub async fn connect(config: &ConnectionConfig) -> Result<Self, ConnectionError> {
		let config = config.resolve_secrets().await?;
		config.validate()?;

		let client = match &config.transport {
			TransportConfig::Http { .. } => {
				let endpoints: Vec<String> = config
					.transport
					.urls()
					.iter()
					.map(|url| url.as_str().to_string())
					.collect();
				EvmClient::connect_http(&endpoints, &config.http_retry).await
			}
			TransportConfig::WebSocket { url } => EvmClient::connect_ws(url.as_str()).await,
		}
		.map_err(|e| {
			ConnectionError::connection_failed("Failed to connect to node", Some(Box::new(e)), None)
		})?;

		Self::with_client(Arc::new(client), &config).await
	}
}

impl<C: EvmClientTrait + 'static> Connection<C> {
	/// Builds a connection over an already connected client.
	///
	/// `config` must have its secrets resolved; its transport section is ignored.
	pub async fn with_client(
		client: Arc<C>,
		config: &ConnectionConfig,
	) -> Result<Self, ConnectionError> {
		let network_id = client.get_network_id().await.map_err(|e| {
			ConnectionError::connection_failed(
				"Failed to discover network",
				Some(e.into()),
				None,
			)
		})?;
		let network = NetworkIdentity::from_network_id(network_id);

		if let Some(expected) = config.network {
			if expected != network {
				return Err(ConnectionError::network_mismatch(
					format!("node serves {}, expected {}", network, expected),
					Some(HashMap::from([(
						"network_id".to_string(),
						network_id.to_string(),
					)])),
				));
			}
		}

		let address_book = AddressBook::for_network(network);
		for (name, address) in config.parsed_overrides()? {
			address_book.write(&name, address);
		}

		let http_client = create_base_http_client().map_err(|e| {
			ConnectionError::connection_failed(
				"Failed to create HTTP client",
				Some(Box::new(e)),
				None,
			)
		})?;

		let api_key = config
			.explorer_api_key
			.as_ref()
			.map(|key| SecretString::new(key.as_str().to_string()));
		let contracts = ContractRepository::for_network(network);
		let mut abis = AbiSource::new(http_client.clone(), contracts.clone(), api_key);
		if let Some(url) = &config.explorer_url {
			abis = abis.with_base_url(url.clone());
		}

		let invoker = RetryingInvoker::new(config.retry.clone());
		let names = Arc::new(EnsNameService::new(client.clone(), network.ens_registry()));
		let resolver = NameResolver::new(address_book.clone(), names);
		let caller = ContractCaller::new(client.clone(), resolver, abis, invoker.clone(), network)
			.stop_on_fatal_errors(config.stop_on_fatal_errors);
		let relay = config
			.relay_base_url()
			.map(|url| RelayClient::new(http_client, &url, invoker.clone()));

		info!(network = %network, aliases = address_book.len(), "connected");

		Ok(Self {
			client,
			network,
			address_book,
			contracts,
			caller,
			relay,
			invoker,
		})
	}

	pub fn network(&self) -> NetworkIdentity {
		self.network
	}

	pub fn client(&self) -> &Arc<C> {
		&self.client
	}

	pub fn address_book(&self) -> &AddressBook {
		&self.address_book
	}

	/// Contract kinds and ABIs, shared with the ABI lookup
	pub fn contracts(&self) -> &ContractRepository {
		&self.contracts
	}

	pub fn caller(&self) -> &ConnectionCaller<C> {
		&self.caller
	}

	pub fn invoker(&self) -> &RetryingInvoker {
		&self.invoker
	}

	pub fn read_address(&self, name: &str) -> Result<Address, RepositoryError> {
		self.address_book.lookup(name)
	}

	/// Stores an alias, replacing any previous entry. Visible to every clone.
	pub fn write_address(&self, name: &str, address: Address) {
		self.address_book.write(name, address);
	}

	/// `"{msg}, the transaction can be viewed at {explorer}/tx/{tx_hash}"`
	pub fn format_transaction_view(
		&self,
		msg: &str,
		tx_hash: &str,
	) -> Result<String, ConnectionError> {
		let base = self.network.explorer_tx_url_base().ok_or_else(|| {
			ConnectionError::unsupported(
				format!("no block explorer for network {}", self.network),
				None,
			)
		})?;
		Ok(format!(
			"{}, the transaction can be viewed at {}{}",
			msg, base, tx_hash
		))
	}

	/// Runs a read-only operation until it returns `Ok` or `cancel` fires
	pub async fn get<T, E, F, Fut>(
		&self,
		cancel: &CancellationToken,
		operation: F,
	) -> Result<T, RetryError>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T, E>>,
		E: Into<BoxError>,
	{
		self.invoker
			.run_with(cancel, operation, predicates::no_error)
			.await
	}

	async fn resolve_target(
		&self,
		cancel: &CancellationToken,
		target: Target,
	) -> Result<Address, ConnectionError> {
		match target {
			Target::Address(address) => Ok(address),
			Target::Alias(alias) => Ok(self.caller.resolver().resolve(cancel, &alias).await?),
		}
	}

	/// Ether balance in wei
	pub async fn balance_of(
		&self,
		cancel: &CancellationToken,
		who: impl Into<Target>,
	) -> Result<U256, ConnectionError> {
		let address = self.resolve_target(cancel, who.into()).await?;
		self.get(cancel, || self.client.get_balance(address))
			.await
			.map_err(|e| ConnectionError::request("eth_getBalance", e))
	}

	pub async fn call(
		&self,
		cancel: &CancellationToken,
		target: impl Into<Target>,
		function: &str,
		args: &[DynSolValue],
	) -> Result<Vec<DynSolValue>, ConnectionError> {
		Ok(self.caller.call(cancel, target, function, args).await?)
	}

	pub async fn query(
		&self,
		cancel: &CancellationToken,
		target: impl Into<Target>,
		function: &str,
		params: &[Vec<u8>],
	) -> Result<Vec<DynSolValue>, ConnectionError> {
		Ok(self.caller.query(cancel, target, function, params).await?)
	}

	/// Relays a call through the configured relay and returns its transaction hash
	pub async fn relay(
		&self,
		cancel: &CancellationToken,
		address: &str,
		fn_name: &str,
		params: &[Vec<u8>],
	) -> Result<String, ConnectionError> {
		let relay = self.relay.as_ref().ok_or_else(|| {
			ConnectionError::unsupported("no relay endpoint configured", None)
		})?;
		Ok(relay.relay(cancel, address, fn_name, params).await?)
	}

	/// Block that included `hash`, polling until it is mined
	pub async fn tx_block_number(
		&self,
		cancel: &CancellationToken,
		hash: B256,
	) -> Result<u64, ConnectionError> {
		self.invoker
			.run_with(
				cancel,
				|| self.client.get_transaction_block_number(hash),
				predicates::present,
			)
			.await
			.map_err(|e| ConnectionError::request("eth_getTransactionByHash", e))
	}

	pub async fn current_block_number(
		&self,
		cancel: &CancellationToken,
	) -> Result<u64, ConnectionError> {
		self.invoker
			.run_with(
				cancel,
				|| self.client.get_latest_block_number(),
				predicates::present,
			)
			.await
			.map_err(|e| ConnectionError::request("eth_getBlockByNumber", e))
	}

	/// Receipt of `hash`, polling until the transaction is mined
	pub async fn wait_mined(
		&self,
		cancel: &CancellationToken,
		hash: B256,
	) -> Result<TransactionReceipt, ConnectionError> {
		self.invoker
			.run_with(
				cancel,
				|| self.client.get_transaction_receipt(hash),
				predicates::present,
			)
			.await
			.map_err(|e| ConnectionError::request("eth_getTransactionReceipt", e))
	}

	pub async fn resolve(
		&self,
		cancel: &CancellationToken,
		input: &str,
	) -> Result<Address, ConnectionError> {
		Ok(self.caller.resolver().resolve(cancel, input).await?)
	}

	pub async fn is_valid(&self, cancel: &CancellationToken, input: &str) -> bool {
		self.caller.resolver().is_valid(cancel, input).await
	}

	/// Read-only view of the token at `target`
	pub async fn erc20_view(
		&self,
		cancel: &CancellationToken,
		target: impl Into<Target>,
	) -> Result<ConnectionToken<C>, ConnectionError> {
		Ok(Erc20::view(self.caller.clone(), cancel, target).await?)
	}

	/// Token at `target` whose transactions are sent through `submitter`
	pub async fn erc20(
		&self,
		cancel: &CancellationToken,
		target: impl Into<Target>,
		submitter: Arc<dyn TransactionSubmitter>,
	) -> Result<ConnectionToken<C>, ConnectionError> {
		Ok(self.erc20_view(cancel, target).await?.with_submitter(submitter))
	}
}
