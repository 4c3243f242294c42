//! Access to an Ethereum node.
//!
//! - [`EvmClientTrait`]: the node queries used by the rest of the crate
//! - [`EvmClient`]: its implementation over a JSON-RPC transport
//! - transports: HTTP with endpoint rotation, or WebSocket

mod client;
mod clients;
mod error;
mod transports;

pub use client::EvmClientTrait;
pub use clients::EvmClient;
pub use error::BlockChainError;
pub use transports::{
	BlockchainTransport, EndpointManager, EthTransport, HttpTransportClient, RotatingTransport,
	TransientErrorRetryStrategy, TransportError, WsTransportClient, CONNECTION_TEST_METHOD,
	ROTATE_ON_ERROR_CODES,
};
