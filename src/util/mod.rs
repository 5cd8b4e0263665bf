//! Shared utilities (hex formatting for trace output).

pub mod hex;
