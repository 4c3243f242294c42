//! Crate-wide macros. They are exported at the crate root.

mod deserialization;
