//! Cloud Resume counter API
//!
//! Serves the page hit and visit counters of the resume site over HTTP.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// HTTP routes
pub mod routes;

/// HTTP server setup
pub mod server;

/// Counter handles shared across handlers
pub mod state;

/// Configuration and error types
pub mod types;
