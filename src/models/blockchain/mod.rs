//! Contract, call and receipt models shared by the resolver, the contract
//! proxy, the relay and the RPC client.

mod call;
mod contract;
mod receipt;

pub use call::{PendingCall, TxExecutionSpeed};
pub use contract::{ContractHandle, Target};
pub use receipt::TransactionReceipt;
