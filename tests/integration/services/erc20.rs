use alloy::primitives::{address, b256, Address, Bytes, U256};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use ethconn::{
	models::TxExecutionSpeed,
	services::{
		connection::{Connection, ConnectionError},
		contract::{ContractError, Erc20View},
	},
	utils::tests::builders::config::ConnectionConfigBuilder,
};

use crate::integration::mocks::{
	encode_string, encode_uint, mainnet_client, MockEvmClientTrait, MockTransactionSubmitter,
};

const REN: Address = address!("408e41876cCCDC0F92210600ef50372656052a38");
const OWNER: Address = address!("00000000000000000000000000000000000000a1");
const RECIPIENT: Address = address!("00000000000000000000000000000000000000b2");

/// A mainnet node whose REN token answers the read-only ERC20 methods
fn token_client() -> MockEvmClientTrait {
	let mut client = mainnet_client();
	client.expect_call().returning(|to, data| {
		assert_eq!(to, REN);
		match &data[..4] {
			// name()
			[0x06, 0xfd, 0xde, 0x03] => Ok(encode_string("Republic Token")),
			// symbol()
			[0x95, 0xd8, 0x9b, 0x41] => Ok(encode_string("REN")),
			// decimals()
			[0x31, 0x3c, 0xe5, 0x67] => Ok(encode_uint(18)),
			// totalSupply()
			[0x18, 0x16, 0x0d, 0xdd] => Ok(encode_uint(1_000_000_000)),
			// balanceOf(address)
			[0x70, 0xa0, 0x82, 0x31] => {
				if data[16..36] == OWNER[..] {
					Ok(encode_uint(250))
				} else {
					Ok(encode_uint(0))
				}
			}
			// allowance(address,address)
			[0xdd, 0x62, 0xed, 0x3e] => Ok(encode_uint(10)),
			_ => Ok(Bytes::new()),
		}
	});
	client
}

async fn connect(client: MockEvmClientTrait) -> Connection<MockEvmClientTrait> {
	Connection::with_client(Arc::new(client), &ConnectionConfigBuilder::new().build())
		.await
		.unwrap()
}

#[tokio::test]
async fn test_view_reads_token_metadata() {
	let connection = connect(token_client()).await;
	let cancel = CancellationToken::new();

	let token = connection.erc20_view(&cancel, "REN").await.unwrap();
	assert_eq!(token.address(), REN);
	assert_eq!(token.name(&cancel).await.unwrap(), "Republic Token");
	assert_eq!(token.symbol(&cancel).await.unwrap(), "REN");
	assert_eq!(token.decimals(&cancel).await.unwrap(), 18);
	assert_eq!(
		token.total_supply(&cancel).await.unwrap(),
		U256::from(1_000_000_000u64)
	);
	assert_eq!(
		token.balance_of(&cancel, OWNER).await.unwrap(),
		U256::from(250)
	);
	assert_eq!(
		token.allowance(&cancel, OWNER, RECIPIENT).await.unwrap(),
		U256::from(10)
	);
}

#[tokio::test]
async fn test_view_cannot_transfer() {
	let connection = connect(token_client()).await;
	let cancel = CancellationToken::new();

	let token = connection.erc20_view(&cancel, REN).await.unwrap();
	let error = token
		.transfer(&cancel, RECIPIENT, U256::from(1), TxExecutionSpeed::Fast, false)
		.await
		.unwrap_err();
	assert!(matches!(error, ContractError::InvalidCall(_)));
}

#[tokio::test]
async fn test_transfer_send_all_uses_submitter_balance() {
	let hash = b256!("0000000000000000000000000000000000000000000000000000000000000abc");

	let mut submitter = MockTransactionSubmitter::new();
	submitter.expect_address().return_const(OWNER);
	submitter
		.expect_submit()
		.withf(|_, call, speed| {
			call.to == REN
				&& call.function == "transfer"
				&& call.arguments[12..32] == RECIPIENT[..]
				&& U256::from_be_slice(&call.arguments[32..64]) == U256::from(250)
				&& *speed == TxExecutionSpeed::Fastest
		})
		.times(1)
		.returning(move |_, _, _| Ok(hash));

	let connection = connect(token_client()).await;
	let cancel = CancellationToken::new();
	let token = connection
		.erc20(&cancel, "REN", Arc::new(submitter))
		.await
		.unwrap();

	let sent = token
		.transfer(&cancel, RECIPIENT, U256::ZERO, TxExecutionSpeed::Fastest, true)
		.await
		.unwrap();
	assert_eq!(sent, hash);
}

#[tokio::test]
async fn test_approve_and_transfer_from() {
	let mut submitter = MockTransactionSubmitter::new();
	submitter
		.expect_submit()
		.withf(|_, call, _| call.function == "approve" && call.arguments.len() == 64)
		.times(1)
		.returning(|_, _, _| Ok(b256!("00000000000000000000000000000000000000000000000000000000000000a1")));
	submitter
		.expect_submit()
		.withf(|_, call, _| call.function == "transferFrom" && call.arguments.len() == 96)
		.times(1)
		.returning(|_, _, _| Ok(b256!("00000000000000000000000000000000000000000000000000000000000000a2")));

	let connection = connect(token_client()).await;
	let cancel = CancellationToken::new();
	let token = connection
		.erc20(&cancel, REN, Arc::new(submitter))
		.await
		.unwrap();

	token
		.approve(&cancel, RECIPIENT, U256::from(5), TxExecutionSpeed::Standard)
		.await
		.unwrap();
	token
		.transfer_from(&cancel, OWNER, RECIPIENT, U256::from(5), TxExecutionSpeed::Slow)
		.await
		.unwrap();
}

#[tokio::test]
async fn test_submission_failure() {
	let mut submitter = MockTransactionSubmitter::new();
	submitter
		.expect_submit()
		.returning(|_, _, _| Err(anyhow::anyhow!("insufficient funds for gas")));

	let connection = connect(token_client()).await;
	let cancel = CancellationToken::new();
	let token = connection
		.erc20(&cancel, REN, Arc::new(submitter))
		.await
		.unwrap();

	let error = token
		.approve(&cancel, RECIPIENT, U256::from(5), TxExecutionSpeed::Standard)
		.await
		.unwrap_err();
	assert!(matches!(error, ContractError::Submission(_)));
	assert!(error.to_string().contains("approve was not submitted"));
}

#[tokio::test]
async fn test_erc20_for_unknown_contract_without_explorer() {
	let mut client = MockEvmClientTrait::new();
	client.expect_get_network_id().returning(|| Ok(1337));
	client.expect_call().never();
	let connection = connect(client).await;

	let error = connection
		.erc20_view(
			&CancellationToken::new(),
			address!("00000000000000000000000000000000000000c3"),
		)
		.await;
	assert!(matches!(
		error,
		Err(ConnectionError::Contract(ContractError::Resolution(_)))
	));
}
