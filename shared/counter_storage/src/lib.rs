//! Counter storage for the Cloud Resume API
//!
//! This crate provides the page hit / visit counters backed by a single-table Dynamo DB design.
//! It is consumed by the backend HTTP service.

pub mod hit_counter;
