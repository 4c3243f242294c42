//! Core domain models.
//!
//! - `network`: identity of the connected chain and the per-network endpoints

mod network;

pub use network::{NetworkIdentity, ENS_REGISTRY};
