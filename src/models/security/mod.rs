//! Secret handling for API keys and other credentials.

mod error;
mod secret;

pub use error::{SecurityError, SecurityResult};
pub use secret::{SecretString, SecretValue};
