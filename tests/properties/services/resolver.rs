use crate::properties::strategies::{address_strategy, foreign_name_strategy};

use alloy::primitives::Address;
use async_trait::async_trait;
use ethconn::{
	repositories::AddressBook,
	services::resolver::{is_name, parse_literal, NameResolver, NameService, ResolverError},
};
use proptest::{prelude::*, test_runner::Config};
use std::sync::{
	atomic::{AtomicU32, Ordering},
	Arc,
};
use tokio_util::sync::CancellationToken;

/// Counts lookups and resolves nothing
#[derive(Default)]
struct CountingNames {
	calls: AtomicU32,
}

#[async_trait]
impl NameService for CountingNames {
	async fn resolve_name(&self, name: &str) -> Result<Address, ResolverError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		Err(ResolverError::not_found(name.to_string(), None, None))
	}
}

fn resolve(input: &str) -> (Result<Address, ResolverError>, u32) {
	let names = Arc::new(CountingNames::default());
	let resolver = NameResolver::new(AddressBook::new(), names.clone());
	let runtime = tokio::runtime::Builder::new_current_thread()
		.build()
		.unwrap();
	let result = runtime.block_on(resolver.resolve(&CancellationToken::new(), input));
	(result, names.calls.load(Ordering::SeqCst))
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// Literal addresses resolve to themselves without a name lookup
	#[test]
	fn test_literal_addresses_resolve_locally(address in address_strategy()) {
		let input = format!("0x{}", hex::encode(address));
		let (result, calls) = resolve(&input);
		prop_assert_eq!(result.unwrap(), address);
		prop_assert_eq!(calls, 0);

		let checksummed = address.to_checksum(None);
		prop_assert_eq!(parse_literal(&checksummed), Some(address));
	}

	// Dotted names outside `.eth` are rejected before any lookup
	#[test]
	fn test_foreign_names_are_invalid(name in foreign_name_strategy()) {
		prop_assert!(!is_name(&name));
		let (result, calls) = resolve(&name);
		prop_assert!(matches!(result, Err(ResolverError::InvalidFormat(_))));
		prop_assert_eq!(calls, 0);
	}

	// `.eth` names always go to the name service exactly once
	#[test]
	fn test_ens_names_are_looked_up_once(label in "[a-z0-9-]{1,16}") {
		let name = format!("{}.eth", label);
		let (result, calls) = resolve(&name);
		prop_assert!(matches!(result, Err(ResolverError::NotFound(_))));
		prop_assert_eq!(calls, 1);
	}
}
