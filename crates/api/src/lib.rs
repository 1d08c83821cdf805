//! promptsheet API server library.
//!
//! Exposes config, state, error handling, routes and service wiring so
//! integration tests and the binary entrypoint share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
