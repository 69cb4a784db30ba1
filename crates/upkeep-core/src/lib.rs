// upkeep-core: Declarative configuration sync for Uptime Robot.
//
// Callers declare the contacts and monitors that should exist, then
// `sync()` fetches the account's actual state and converges it:
// missing entities are created, obsolete ones deleted, drifted ones
// updated (or replaced, where the API refuses in-place edits).

pub mod config;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SyncOptions;
pub use error::SyncError;
pub use model::{Contact, ContactRef, Monitor};
pub use reconcile::KindSummary;
pub use session::{SyncSummary, Upkeep};

// Transport-layer types callers need for configuration and ids.
pub use upkeep_api::{Error as ApiError, ServerId, TransportConfig};
