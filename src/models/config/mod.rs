//! Configuration loading and validation.
//!
//! A connection is described by a single JSON document ([`ConnectionConfig`])
//! that is loaded, has its secrets resolved and is validated through the
//! [`ConfigLoader`] trait.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use std::path::Path;

mod connection_config;
mod error;

pub use connection_config::{ConnectionConfig, TransportConfig};
pub use error::ConfigError;

/// Common interface for loading configuration files
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Load, resolve and validate the configuration stored at `path`
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Validate the configuration
	fn validate(&self) -> Result<(), ConfigError>;

	/// Warn about endpoints that use unencrypted protocols
	fn validate_protocol(&self);

	/// Replace every secret reference with its resolved value
	async fn resolve_secrets(&self) -> Result<Self, ConfigError>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
