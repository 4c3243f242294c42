//! Contract calls: packing, retried execution and decoding, plus the ERC20
//! wrapper built on top.

mod caller;
mod erc20;
mod error;

pub use caller::ContractCaller;
pub use erc20::{Erc20, Erc20View, TransactionSubmitter};
pub use error::ContractError;
