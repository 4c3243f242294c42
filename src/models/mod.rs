//! Domain models shared by the repositories and services.
//!
//! - `blockchain`: contract handles, pending calls and receipts
//! - `config`: connection configuration loading and validation
//! - `core`: network identity
//! - `security`: secret values

mod blockchain;
mod config;
mod core;
mod security;

pub use blockchain::{ContractHandle, PendingCall, Target, TransactionReceipt, TxExecutionSpeed};

pub use config::{ConfigError, ConfigLoader, ConnectionConfig, TransportConfig};

pub use core::{NetworkIdentity, ENS_REGISTRY};

pub use security::{SecretString, SecretValue, SecurityError, SecurityResult};
