//! Built-in contract aliases and interfaces.

use alloy::primitives::{address, Address};

use crate::models::NetworkIdentity;

/// Contract kind of every built-in token
pub const ERC20_KIND: &str = "ERC20";

pub static MAINNET_ADDRESSES: &[(&str, Address)] = &[
	("DGX", address!("4f3AfEC4E5a3F2A6a1A411DEF7D7dFe50eE057bF")),
	("TUSD", address!("8dd5fbCe2F6a956C3022bA3663759011Dd51e73E")),
	("REN", address!("408e41876cCCDC0F92210600ef50372656052a38")),
	("ZRX", address!("E41d2489571d322189246DaFA5ebDe1F4699F498")),
	("OMG", address!("d26114cd6EE289AccF82350c8d8487fedB8A0C07")),
];

pub static ROPSTEN_ADDRESSES: &[(&str, Address)] = &[
	("RenExOrderbook", address!("A1D3EEcb76285B4435550E4D963B8042A8b11111")),
	("RenExSettlement", address!("A1D3EEcb76285B4435550E4D963B8042A8b11111")),
	("WBTC", address!("A1D3EEcb76285B4435550E4D963B8042A8b11111")),
	("SwapperdETH", address!("2218fa20c33765e7e01671ee6aaca75fbaf3a974")),
	("SwapperdWBTC", address!("2218fa20c33765e7e01671ee6aaca75fbaf3a974")),
];

pub static KOVAN_ADDRESSES: &[(&str, Address)] = &[
	("RenExOrderbook", address!("A1D3EEcb76285B4435550E4D963B8042A8b11111")),
	("RenExSettlement", address!("A1D3EEcb76285B4435550E4D963B8042A8b11111")),
	("WBTC", address!("A1D3EEcb76285B4435550E4D963B8042A8bffbF0")),
	("SwapperdETH", address!("2218fa20c33765e7e01671ee6aaca75fbaf3a974")),
	("DGX", address!("932F4580B261e9781A6c3c102133C8fDd4503DFc")),
	("TUSD", address!("525389752ffe6487d33EF53FBcD4E5D3AD7937a0")),
	("REN", address!("2CD647668494c1B15743AB283A0f980d90a87394")),
	("ZRX", address!("6EB628dCeFA95802899aD3A9EE0C7650Ac63d543")),
	("OMG", address!("66497ba75dD127b46316d806c077B06395918064")),
];

/// Aliases that name ERC20 tokens
pub static TOKEN_ALIASES: &[&str] = &["DGX", "TUSD", "REN", "ZRX", "OMG", "WBTC"];

/// Built-in aliases of `network`; empty for networks without a table
pub fn addresses_for(network: NetworkIdentity) -> &'static [(&'static str, Address)] {
	match network {
		NetworkIdentity::Mainnet => MAINNET_ADDRESSES,
		NetworkIdentity::Ropsten => ROPSTEN_ADDRESSES,
		NetworkIdentity::Kovan => KOVAN_ADDRESSES,
		_ => &[],
	}
}

/// Detailed ERC20 interface (EIP-20 plus `name`, `symbol`, `decimals`)
pub const ERC20_ABI: &str = r#"[
	{"type":"function","name":"name","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"string"}]},
	{"type":"function","name":"symbol","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"string"}]},
	{"type":"function","name":"decimals","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint8"}]},
	{"type":"function","name":"totalSupply","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint256"}]},
	{"type":"function","name":"balanceOf","stateMutability":"view","inputs":[{"name":"who","type":"address"}],"outputs":[{"name":"","type":"uint256"}]},
	{"type":"function","name":"allowance","stateMutability":"view","inputs":[{"name":"owner","type":"address"},{"name":"spender","type":"address"}],"outputs":[{"name":"","type":"uint256"}]},
	{"type":"function","name":"transfer","stateMutability":"nonpayable","inputs":[{"name":"to","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]},
	{"type":"function","name":"approve","stateMutability":"nonpayable","inputs":[{"name":"spender","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]},
	{"type":"function","name":"transferFrom","stateMutability":"nonpayable","inputs":[{"name":"from","type":"address"},{"name":"to","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]},
	{"type":"event","name":"Transfer","anonymous":false,"inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}]},
	{"type":"event","name":"Approval","anonymous":false,"inputs":[{"name":"owner","type":"address","indexed":true},{"name":"spender","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}]}
]"#;
