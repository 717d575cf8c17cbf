//! HTTP response helpers shared by store connectors.

mod parser;

pub use parser::*;
