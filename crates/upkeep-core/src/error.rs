// ── Core error types ──
//
// Everything `sync()` or a declaration call can fail with. Errors are
// never swallowed or retried: the first failure aborts the run, and
// mutations already applied stand (no rollback).

use thiserror::Error;

/// Every failure mode of the core crate, in one enum.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Validation ───────────────────────────────────────────────────
    /// A fetched record lacks a field the entity kind requires.
    #[error("{kind} record is missing required field `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// A fetched record carries a value that cannot be coerced to the
    /// field's declared type.
    #[error("invalid {kind} field `{field}`: {reason}")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
        reason: String,
    },

    // ── Declaration ──────────────────────────────────────────────────
    /// Two desired entities of the same kind share an identity.
    #[error("duplicate {kind}: {identity}")]
    DuplicateIdentity {
        kind: &'static str,
        identity: String,
    },

    /// A monitor is associated with a contact this session never
    /// declared (e.g. a handle from another session).
    #[error("monitor `{monitor}` references unknown contact `{contact}`")]
    UnknownContact { monitor: String, contact: String },

    // ── Remote ───────────────────────────────────────────────────────
    /// Any transport, protocol, or application-level API failure.
    #[error(transparent)]
    Api(#[from] upkeep_api::Error),
}
