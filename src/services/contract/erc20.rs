//! ERC20 token wrapper.

use alloy::{
	dyn_abi::DynSolValue,
	primitives::{Address, B256, U256},
};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
	models::{ContractHandle, PendingCall, Target, TxExecutionSpeed},
	services::{
		blockchain::EvmClientTrait,
		contract::{ContractCaller, ContractError},
		resolver::NameService,
	},
};

/// Signs and broadcasts transactions on behalf of one account.
///
/// Gas pricing and nonces are the submitter's business; it only receives the
/// packed call and the requested speed.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
	/// Account the transactions are sent from
	fn address(&self) -> Address;

	/// Submits `call` and returns the transaction hash
	async fn submit(
		&self,
		cancel: &CancellationToken,
		call: PendingCall,
		speed: TxExecutionSpeed,
	) -> Result<B256, anyhow::Error>;
}

/// Read-only ERC20 methods
#[async_trait]
pub trait Erc20View: Send + Sync {
	async fn name(&self, cancel: &CancellationToken) -> Result<String, ContractError>;

	async fn symbol(&self, cancel: &CancellationToken) -> Result<String, ContractError>;

	async fn decimals(&self, cancel: &CancellationToken) -> Result<u8, ContractError>;

	async fn total_supply(&self, cancel: &CancellationToken) -> Result<U256, ContractError>;

	async fn balance_of(
		&self,
		cancel: &CancellationToken,
		who: Address,
	) -> Result<U256, ContractError>;

	async fn allowance(
		&self,
		cancel: &CancellationToken,
		owner: Address,
		spender: Address,
	) -> Result<U256, ContractError>;
}

/// An ERC20 token bound to one resolved address.
///
/// Built without a submitter it is a view; the mutating methods then fail
/// with [`ContractError::InvalidCall`].
pub struct Erc20<C: EvmClientTrait, N: NameService> {
	caller: ContractCaller<C, N>,
	handle: ContractHandle,
	submitter: Option<Arc<dyn TransactionSubmitter>>,
}

impl<C: EvmClientTrait, N: NameService> Clone for Erc20<C, N> {
	fn clone(&self) -> Self {
		Self {
			caller: self.caller.clone(),
			handle: self.handle.clone(),
			submitter: self.submitter.clone(),
		}
	}
}

fn single_value(
	mut values: Vec<DynSolValue>,
	function: &str,
) -> Result<DynSolValue, ContractError> {
	if values.len() != 1 {
		return Err(ContractError::decode(
			format!("expected one return value, got {}", values.len()),
			None,
			Some(HashMap::from([("function".to_string(), function.to_string())])),
		));
	}
	Ok(values.remove(0))
}

fn unexpected_type(function: &str, value: &DynSolValue) -> ContractError {
	ContractError::decode(
		format!("unexpected return type {:?}", value.as_type()),
		None,
		Some(HashMap::from([("function".to_string(), function.to_string())])),
	)
}

impl<C: EvmClientTrait, N: NameService> Erc20<C, N> {
	/// Resolves `target` and its ABI once
	pub async fn view(
		caller: ContractCaller<C, N>,
		cancel: &CancellationToken,
		target: impl Into<Target>,
	) -> Result<Self, ContractError> {
		let address = caller.resolve_target(cancel, &target.into()).await?;
		let handle = caller.handle(address).await?;
		Ok(Self {
			caller,
			handle,
			submitter: None,
		})
	}

	pub fn with_submitter(mut self, submitter: Arc<dyn TransactionSubmitter>) -> Self {
		self.submitter = Some(submitter);
		self
	}

	pub fn address(&self) -> Address {
		self.handle.address
	}

	async fn read(
		&self,
		cancel: &CancellationToken,
		function: &str,
		args: &[DynSolValue],
	) -> Result<DynSolValue, ContractError> {
		let values = self
			.caller
			.call_handle(cancel, &self.handle, function, args)
			.await?;
		single_value(values, function)
	}

	async fn read_uint(
		&self,
		cancel: &CancellationToken,
		function: &str,
		args: &[DynSolValue],
	) -> Result<U256, ContractError> {
		let value = self.read(cancel, function, args).await?;
		value
			.as_uint()
			.map(|(number, _)| number)
			.ok_or_else(|| unexpected_type(function, &value))
	}

	async fn read_string(
		&self,
		cancel: &CancellationToken,
		function: &str,
	) -> Result<String, ContractError> {
		let value = self.read(cancel, function, &[]).await?;
		value
			.as_str()
			.map(str::to_string)
			.ok_or_else(|| unexpected_type(function, &value))
	}

	fn submitter(&self) -> Result<&Arc<dyn TransactionSubmitter>, ContractError> {
		self.submitter.as_ref().ok_or_else(|| {
			ContractError::invalid_call(
				"token was opened read-only",
				None,
				Some(HashMap::from([(
					"token".to_string(),
					self.handle.address.to_string(),
				)])),
			)
		})
	}

	async fn submit(
		&self,
		cancel: &CancellationToken,
		function: &str,
		args: &[DynSolValue],
		speed: TxExecutionSpeed,
	) -> Result<B256, ContractError> {
		let submitter = self.submitter()?;
		let call = self.caller.pack(&self.handle, function, args)?;
		let hash = submitter.submit(cancel, call, speed).await.map_err(|e| {
			ContractError::submission(
				format!("{} was not submitted", function),
				Some(e.into()),
				Some(HashMap::from([("speed".to_string(), speed.to_string())])),
			)
		})?;
		info!(token = %self.handle.address, function, %hash, "transaction submitted");
		Ok(hash)
	}

	/// Sends `amount` to `to`. With `send_all` the submitter's whole balance
	/// is sent instead.
	pub async fn transfer(
		&self,
		cancel: &CancellationToken,
		to: Address,
		amount: U256,
		speed: TxExecutionSpeed,
		send_all: bool,
	) -> Result<B256, ContractError> {
		let amount = if send_all {
			let owner = self.submitter()?.address();
			self.balance_of(cancel, owner).await?
		} else {
			amount
		};
		self.submit(
			cancel,
			"transfer",
			&[DynSolValue::Address(to), DynSolValue::Uint(amount, 256)],
			speed,
		)
		.await
	}

	pub async fn approve(
		&self,
		cancel: &CancellationToken,
		spender: Address,
		amount: U256,
		speed: TxExecutionSpeed,
	) -> Result<B256, ContractError> {
		self.submit(
			cancel,
			"approve",
			&[DynSolValue::Address(spender), DynSolValue::Uint(amount, 256)],
			speed,
		)
		.await
	}

	pub async fn transfer_from(
		&self,
		cancel: &CancellationToken,
		from: Address,
		to: Address,
		amount: U256,
		speed: TxExecutionSpeed,
	) -> Result<B256, ContractError> {
		self.submit(
			cancel,
			"transferFrom",
			&[
				DynSolValue::Address(from),
				DynSolValue::Address(to),
				DynSolValue::Uint(amount, 256),
			],
			speed,
		)
		.await
	}
}

#[async_trait]
impl<C: EvmClientTrait, N: NameService> Erc20View for Erc20<C, N> {
	async fn name(&self, cancel: &CancellationToken) -> Result<String, ContractError> {
		self.read_string(cancel, "name").await
	}

	async fn symbol(&self, cancel: &CancellationToken) -> Result<String, ContractError> {
		self.read_string(cancel, "symbol").await
	}

	async fn decimals(&self, cancel: &CancellationToken) -> Result<u8, ContractError> {
		let value = self.read_uint(cancel, "decimals", &[]).await?;
		u8::try_from(value).map_err(|e| {
			ContractError::decode("decimals out of range", Some(Box::new(e)), None)
		})
	}

	async fn total_supply(&self, cancel: &CancellationToken) -> Result<U256, ContractError> {
		self.read_uint(cancel, "totalSupply", &[]).await
	}

	async fn balance_of(
		&self,
		cancel: &CancellationToken,
		who: Address,
	) -> Result<U256, ContractError> {
		self.read_uint(cancel, "balanceOf", &[DynSolValue::Address(who)])
			.await
	}

	async fn allowance(
		&self,
		cancel: &CancellationToken,
		owner: Address,
		spender: Address,
	) -> Result<U256, ContractError> {
		self.read_uint(
			cancel,
			"allowance",
			&[DynSolValue::Address(owner), DynSolValue::Address(spender)],
		)
		.await
	}
}
