//! Resolution of user input to a contract or account address.

use alloy::primitives::Address;
use std::{collections::HashMap, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
	repositories::{AddressBook, AddressBookTrait},
	services::resolver::{NameService, ResolverError},
};

/// Top-level suffix of names handed to the name service
pub const NAME_SUFFIX: &str = "eth";

/// Parses a literal address: `0x` followed by 40 hex digits, or 40 hex digits.
pub fn parse_literal(input: &str) -> Option<Address> {
	let digits = match input.len() {
		42 if input.starts_with("0x") => &input[2..],
		40 => input,
		_ => return None,
	};
	if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
		return None;
	}
	let mut bytes = [0u8; 20];
	hex::decode_to_slice(digits, &mut bytes).ok()?;
	Some(Address::from(bytes))
}

/// Whether `input` is a dotted name ending in [`NAME_SUFFIX`]
pub fn is_name(input: &str) -> bool {
	let mut labels = input.rsplit('.');
	let suffix = labels.next();
	labels.next().is_some() && suffix == Some(NAME_SUFFIX)
}

/// Turns aliases, literal addresses and names into addresses.
///
/// Aliases in the address book are tried first. Literal addresses are
/// accepted without checking that an account exists; only the name service
/// can report `NotFound`.
pub struct NameResolver<N: NameService> {
	address_book: AddressBook,
	names: Arc<N>,
}

impl<N: NameService> Clone for NameResolver<N> {
	fn clone(&self) -> Self {
		Self {
			address_book: self.address_book.clone(),
			names: self.names.clone(),
		}
	}
}

impl<N: NameService> NameResolver<N> {
	pub fn new(address_book: AddressBook, names: Arc<N>) -> Self {
		Self {
			address_book,
			names,
		}
	}

	pub fn address_book(&self) -> &AddressBook {
		&self.address_book
	}

	async fn lookup_name(
		&self,
		cancel: &CancellationToken,
		name: &str,
	) -> Result<Address, ResolverError> {
		tokio::select! {
			biased;
			result = self.names.resolve_name(name) => result,
			_ = cancel.cancelled() => Err(ResolverError::cancelled(Some(HashMap::from([(
				"input".to_string(),
				name.to_string(),
			)])))),
		}
	}

	/// Whether `input` names something this resolver can turn into an address.
	/// Names count as valid only if the name service resolves them.
	pub async fn is_valid(&self, cancel: &CancellationToken, input: &str) -> bool {
		if self.address_book.lookup(input).is_ok() || parse_literal(input).is_some() {
			return true;
		}
		is_name(input) && self.lookup_name(cancel, input).await.is_ok()
	}

	pub async fn resolve(
		&self,
		cancel: &CancellationToken,
		input: &str,
	) -> Result<Address, ResolverError> {
		if let Ok(address) = self.address_book.lookup(input) {
			debug!(alias = input, %address, "resolved alias");
			return Ok(address);
		}
		if let Some(address) = parse_literal(input) {
			return Ok(address);
		}
		if is_name(input) {
			return self.lookup_name(cancel, input).await;
		}
		Err(ResolverError::invalid_format(
			"invalid address or alias",
			None,
			Some(HashMap::from([("input".to_string(), input.to_string())])),
		))
	}
}
