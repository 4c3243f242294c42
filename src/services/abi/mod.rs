//! Contract ABI resolution.

mod error;
mod source;

pub use error::AbiError;
pub use source::AbiSource;
