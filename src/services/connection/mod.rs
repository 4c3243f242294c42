//! Connection setup and the operations callers use day to day.

mod error;
mod service;

pub use error::ConnectionError;
pub use service::{Connection, ConnectionCaller, ConnectionToken};
