//! Core domain entities
//!
//! All entities are defined here. These are pure data structures
//! with small helpers - no I/O or external dependencies.

mod access;
mod account;
mod currency;
mod profile;
mod wallet;
pub mod result;

pub use access::{AccessDecision, DenialReason};
pub use account::{Account, AccountStatus};
pub use currency::CurrencyCode;
pub use profile::UserProfile;
pub use wallet::{Wallet, WalletIconFile};
