//! Shared task model and filter definitions for the `todos` REST contract.

pub mod filter;
pub mod task;
