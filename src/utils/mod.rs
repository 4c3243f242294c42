//! Utility modules for common functionality.
//!
//! - http: HTTP client construction and retry settings
//! - logging: Error context and optional subscriber setup
//! - macros: Macros for common functionality
//! - parsing: Hex quantity and word parsing
//! - tests: Test helpers

pub mod http;
pub mod logging;
pub mod macros;
pub mod parsing;

pub use http::*;
pub use macros::*;
pub use parsing::*;
