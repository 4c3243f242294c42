//! Address, alias and ENS name resolution.

mod ens;
mod error;
mod service;

pub use ens::{namehash, EnsNameService, NameService, ADDR_SELECTOR, RESOLVER_SELECTOR};
pub use error::ResolverError;
pub use service::{is_name, parse_literal, NameResolver, NAME_SUFFIX};
