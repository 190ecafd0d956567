//! Reference REST backend for the `todos` client.
//!
//! Exposes the server for use in tests and embedding. Tasks live in memory
//! and are served as JSON under `/todos`.

pub mod config;
pub mod server;
pub mod store;
