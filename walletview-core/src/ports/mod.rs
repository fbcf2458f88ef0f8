//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod log_sink;
mod remote_store;
mod session;

pub use log_sink::{LogEvent, LogLevel, LogSink};
pub use remote_store::{decode_record, tables, Filter, Record, RemoteStore};
pub use session::AuthSession;
