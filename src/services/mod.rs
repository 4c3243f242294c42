//! Services implementing the client logic.
//!
//! - `abi`: contract ABI lookup (local table, then block explorer)
//! - `blockchain`: node client and JSON-RPC transports
//! - `connection`: connection setup and the public operations
//! - `contract`: contract calls and the ERC20 wrapper
//! - `relay`: transaction relay client
//! - `resolver`: alias, address and ENS name resolution
//! - `retry`: retry-until-success-or-cancel engine

pub mod abi;
pub mod blockchain;
pub mod connection;
pub mod contract;
pub mod relay;
pub mod resolver;
pub mod retry;
