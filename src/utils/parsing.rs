//! Parsing helpers for JSON-RPC values and raw call arguments.

/// Parses a JSON-RPC quantity (`"0x1a"`) into a `u64`.
pub fn parse_quantity(value: &str) -> Result<u64, String> {
	let digits = value
		.strip_prefix("0x")
		.or_else(|| value.strip_prefix("0X"))
		.ok_or_else(|| format!("Quantity '{}' is missing the 0x prefix", value))?;
	if digits.is_empty() {
		return Err(format!("Quantity '{}' has no digits", value));
	}
	u64::from_str_radix(digits, 16).map_err(|e| format!("Invalid quantity '{}': {}", value, e))
}

/// Parses the `net_version` result, which nodes return in decimal but a few
/// return as a hex quantity.
pub fn parse_network_id(value: &str) -> Result<u64, String> {
	if value.starts_with("0x") || value.starts_with("0X") {
		return parse_quantity(value);
	}
	value
		.trim()
		.parse::<u64>()
		.map_err(|e| format!("Invalid network id '{}': {}", value, e))
}

/// Fits a raw argument into one 32-byte ABI word: longer values keep their
/// first 32 bytes, shorter ones are left-padded with zeros.
pub fn pad_word(param: &[u8]) -> [u8; 32] {
	let mut word = [0u8; 32];
	if param.len() >= 32 {
		word.copy_from_slice(&param[..32]);
	} else {
		word[32 - param.len()..].copy_from_slice(param);
	}
	word
}

/// Trims whitespace and lowercases.
pub fn normalize_string(input: &str) -> String {
	input.trim().to_lowercase()
}
