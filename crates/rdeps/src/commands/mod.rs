//! Command implementations for the rdeps CLI.

pub mod resolve;
