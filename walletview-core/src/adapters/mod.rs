//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the local RemoteStore
//! - PostgREST-style HTTP client for the hosted RemoteStore
//! - Account sessions for AuthSession
//! - `log` crate, in-memory and fan-out LogSinks

pub mod duckdb;
pub mod rest;
pub mod session;
pub mod sinks;

#[cfg(test)]
pub mod rest_mock;
