//! Service layer - resolution logic
//!
//! Services implement the read path over the ports. Each focuses on one
//! concern; `resolution` composes them for call sites.

mod access;
mod currency;
mod format;
mod icon;
pub mod logging;
pub mod migration;
mod resolution;

pub use access::{check_access, AccessGate};
pub use currency::{resolve_currency, CurrencyResolver, ProfileCurrencyResolver};
pub use format::format_amount;
pub use icon::{
    resolve_icon_url_fast, IconResolver, IconResolverConfig, StoreIconResolver,
    DEFAULT_ICON_BUCKET, MAX_LOOKUP_RETRIES,
};
pub use logging::{LogEntry, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use resolution::{reconcile, Resolution, ResolutionFacade, WalletIcon, WalletsResolution};
