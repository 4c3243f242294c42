//! Ethereum connection client.
//!
//! A connection to a single Ethereum node over HTTP or WebSocket, with the
//! pieces needed to work with named contracts on it:
//!
//! - Per-network address book of well-known contracts and tokens
//! - Contract ABIs from a local table, falling back to the block explorer
//! - Alias, literal address and ENS name resolution
//! - Contract calls and an ERC20 wrapper, retried until success or cancellation
//! - Transaction relay and receipt polling
//!
//! # Module Structure
//!
//! - `models`: Configuration, network identity and call data types
//! - `repositories`: Address book and contract table
//! - `services`: Node client, resolution, contract calls and the connection
//! - `utils`: Logging, HTTP and parsing helpers

pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
