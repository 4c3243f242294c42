//! Transaction relay client.

mod client;
mod error;

pub use client::{RelayClient, RelayRequest};
pub use error::RelayError;
