//! In-memory stores owned by a connection.
//!
//! - Address book: alias to address, seeded per network
//! - Contracts: address to contract kind and kind to ABI, doubling as the ABI cache
//! - Defaults: the built-in tables both are seeded from

mod address_book;
mod contracts;
mod error;

pub mod defaults;

pub use address_book::{AddressBook, AddressBookTrait};
pub use contracts::{parse_abi, ContractRepository};
pub use error::RepositoryError;
