use alloy::primitives::Address;
use proptest::prelude::*;

pub fn address_strategy() -> impl Strategy<Value = Address> {
	any::<[u8; 20]>().prop_map(Address::from)
}

/// Aliases as they appear in the address book
pub fn alias_strategy() -> impl Strategy<Value = String> {
	"[A-Za-z][A-Za-z0-9_]{0,11}"
}

/// Dotted names under a top-level domain other than `eth`
pub fn foreign_name_strategy() -> impl Strategy<Value = String> {
	("[a-z0-9]{1,12}", "[a-z]{2,6}")
		.prop_filter("not an ENS name", |(_, tld)| tld != "eth")
		.prop_map(|(label, tld)| format!("{}.{}", label, tld))
}
