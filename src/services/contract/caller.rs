//! Read-only contract calls under the retry engine.

use alloy::{
	dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier},
	primitives::{Address, Bytes},
};
use reqwest_retry::Retryable;
use std::{collections::HashMap, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::{
	models::{ContractHandle, NetworkIdentity, PendingCall, Target},
	repositories::parse_abi,
	services::{
		abi::AbiSource,
		blockchain::EvmClientTrait,
		contract::ContractError,
		resolver::{NameResolver, NameService},
		retry::{predicates, Outcome, RetryingInvoker},
	},
	utils::parsing::pad_word,
};

/// Packs calls from ABIs, runs them through the retry engine and decodes the
/// results.
///
/// Targets and ABIs are resolved once per call, before the first attempt.
/// Only the `eth_call` itself is retried; an empty result counts as a failed
/// attempt.
pub struct ContractCaller<C: EvmClientTrait, N: NameService> {
	client: Arc<C>,
	resolver: NameResolver<N>,
	abis: AbiSource,
	invoker: RetryingInvoker,
	network: NetworkIdentity,
	stop_on_fatal: bool,
}

impl<C: EvmClientTrait, N: NameService> Clone for ContractCaller<C, N> {
	fn clone(&self) -> Self {
		Self {
			client: self.client.clone(),
			resolver: self.resolver.clone(),
			abis: self.abis.clone(),
			invoker: self.invoker.clone(),
			network: self.network,
			stop_on_fatal: self.stop_on_fatal,
		}
	}
}

impl<C: EvmClientTrait, N: NameService> ContractCaller<C, N> {
	pub fn new(
		client: Arc<C>,
		resolver: NameResolver<N>,
		abis: AbiSource,
		invoker: RetryingInvoker,
		network: NetworkIdentity,
	) -> Self {
		Self {
			client,
			resolver,
			abis,
			invoker,
			network,
			stop_on_fatal: false,
		}
	}

	/// Stops retrying as soon as an attempt fails with an error known to be
	/// permanent (malformed request, revert). By default every error is retried.
	pub fn stop_on_fatal_errors(mut self, enabled: bool) -> Self {
		self.stop_on_fatal = enabled;
		self
	}

	pub fn network(&self) -> NetworkIdentity {
		self.network
	}

	pub fn resolver(&self) -> &NameResolver<N> {
		&self.resolver
	}

	/// Resolves a target once
	pub async fn resolve_target(
		&self,
		cancel: &CancellationToken,
		target: &Target,
	) -> Result<Address, ContractError> {
		match target {
			Target::Address(address) => Ok(*address),
			Target::Alias(alias) => self.resolver.resolve(cancel, alias).await.map_err(|e| {
				ContractError::resolution(
					format!("failed to resolve '{}'", alias),
					Some(Box::new(e)),
					None,
				)
			}),
		}
	}

	/// The contract at `address` with its ABI, from the local table or the explorer
	pub async fn handle(&self, address: Address) -> Result<ContractHandle, ContractError> {
		let metadata = || Some(HashMap::from([("address".to_string(), address.to_string())]));

		let abi_json = self
			.abis
			.resolve_abi(self.network, address)
			.await
			.map_err(|e| {
				ContractError::resolution("failed to resolve ABI", Some(Box::new(e)), metadata())
			})?;
		let abi = parse_abi(&abi_json).map_err(|e| {
			ContractError::resolution("ABI is not valid JSON", Some(Box::new(e)), metadata())
		})?;
		Ok(ContractHandle::new(address, Arc::new(abi)))
	}

	/// Encodes `args` for `function` of `handle`
	pub fn pack(
		&self,
		handle: &ContractHandle,
		function: &str,
		args: &[DynSolValue],
	) -> Result<PendingCall, ContractError> {
		let metadata = || Some(HashMap::from([("function".to_string(), function.to_string())]));

		let abi_function = handle.function(function).ok_or_else(|| {
			ContractError::invalid_call("function not found in ABI", None, metadata())
		})?;
		let arguments = abi_function.abi_encode_input_raw(args).map_err(|e| {
			ContractError::invalid_call("failed to encode arguments", Some(Box::new(e)), metadata())
		})?;

		Ok(PendingCall::new(
			handle.address,
			function,
			abi_function.selector(),
			Bytes::from(arguments),
		))
	}

	fn classify(&self, result: Result<Bytes, anyhow::Error>) -> Outcome<Bytes> {
		match result {
			Err(error)
				if self.stop_on_fatal
					&& matches!(predicates::classify_anyhow(&error), Retryable::Fatal) =>
			{
				Outcome::Terminal(error.into())
			}
			result => predicates::non_empty_bytes(result),
		}
	}

	/// Runs `eth_call` for `call` until it returns data
	#[instrument(skip(self, cancel), fields(to = %call.to, function = %call.function))]
	pub async fn execute(
		&self,
		cancel: &CancellationToken,
		call: &PendingCall,
	) -> Result<Bytes, ContractError> {
		let calldata = call.calldata();
		self.invoker
			.run_with(
				cancel,
				|| self.client.call(call.to, calldata.clone()),
				|result| self.classify(result),
			)
			.await
			.map_err(|e| {
				ContractError::execution(
					format!("{} call failed", call.function),
					e,
					Some(HashMap::from([("to".to_string(), call.to.to_string())])),
				)
			})
	}

	fn decode(
		handle: &ContractHandle,
		call: &PendingCall,
		output: &[u8],
	) -> Result<Vec<DynSolValue>, ContractError> {
		let metadata = || {
			Some(HashMap::from([(
				"function".to_string(),
				call.function.clone(),
			)]))
		};
		let function = handle.function(&call.function).ok_or_else(|| {
			ContractError::invalid_call("function not found in ABI", None, metadata())
		})?;
		let types = function
			.outputs
			.iter()
			.map(|param| param.resolve())
			.collect::<Result<Vec<DynSolType>, _>>()
			.map_err(|e| {
				ContractError::decode("unsupported output type", Some(Box::new(e)), metadata())
			})?;

		match DynSolType::Tuple(types).abi_decode_params(output) {
			Ok(DynSolValue::Tuple(values)) => Ok(values),
			Ok(value) => Ok(vec![value]),
			Err(e) => Err(ContractError::decode(
				"failed to decode call output",
				Some(Box::new(e)),
				metadata(),
			)),
		}
	}

	/// Calls `function` on an already resolved contract
	pub async fn call_handle(
		&self,
		cancel: &CancellationToken,
		handle: &ContractHandle,
		function: &str,
		args: &[DynSolValue],
	) -> Result<Vec<DynSolValue>, ContractError> {
		let call = self.pack(handle, function, args)?;
		let output = self.execute(cancel, &call).await?;
		Self::decode(handle, &call, &output)
	}

	/// Resolves `target` and its ABI, then calls `function` with typed arguments
	pub async fn call(
		&self,
		cancel: &CancellationToken,
		target: impl Into<Target>,
		function: &str,
		args: &[DynSolValue],
	) -> Result<Vec<DynSolValue>, ContractError> {
		let address = self.resolve_target(cancel, &target.into()).await?;
		let handle = self.handle(address).await?;
		self.call_handle(cancel, &handle, function, args).await
	}

	/// Like [`call`](Self::call) with raw arguments, each left-padded (or
	/// truncated) to one 32-byte word
	pub async fn query(
		&self,
		cancel: &CancellationToken,
		target: impl Into<Target>,
		function: &str,
		params: &[Vec<u8>],
	) -> Result<Vec<DynSolValue>, ContractError> {
		let address = self.resolve_target(cancel, &target.into()).await?;
		let handle = self.handle(address).await?;
		let selector = handle
			.function(function)
			.map(|f| f.selector())
			.ok_or_else(|| {
				ContractError::invalid_call(
					"function not found in ABI",
					None,
					Some(HashMap::from([("function".to_string(), function.to_string())])),
				)
			})?;

		let arguments: Vec<u8> = params.iter().flat_map(|p| pad_word(p)).collect();
		debug!(args = params.len(), "querying with raw arguments");

		let call = PendingCall::new(address, function, selector, Bytes::from(arguments));
		let output = self.execute(cancel, &call).await?;
		Self::decode(&handle, &call, &output)
	}
}
