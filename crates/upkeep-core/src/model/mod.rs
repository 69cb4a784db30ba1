// ── Entity model ──
//
// Fixed, statically typed records for the two resource kinds the API
// manages. Entities exist in two flavors sharing one type: desired
// entities built by declaration calls, and transient mirrors of
// fetched records built by `from_record` during reconciliation.

pub mod contact;
pub mod monitor;

mod record;

pub use contact::{Contact, ContactRef};
pub use monitor::Monitor;
