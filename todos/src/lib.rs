//! `todos` -- terminal task-list editor library.
//!
//! The [`controller::Controller`] owns all client state and coordinates it
//! with asynchronous [`store::RemoteStore`] calls.

pub mod app;
pub mod config;
pub mod controller;
pub mod state;
pub mod store;
pub mod ui;
