// Resource kinds, wire identifiers, and request parameters.
//
// The Uptime Robot v2 API is RPC-over-POST: every operation is a method
// name appended to the base URL, with form-encoded parameters. This
// module maps the two resource kinds onto their method names and
// envelope keys so the client can stay generic.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Resource ────────────────────────────────────────────────────────

/// A kind of remote resource the API manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    AlertContact,
    Monitor,
}

impl Resource {
    /// Method that lists all records of this kind (paginated).
    pub fn list_method(self) -> &'static str {
        match self {
            Self::AlertContact => "getAlertContacts",
            Self::Monitor => "getMonitors",
        }
    }

    /// Method that creates a record of this kind.
    pub fn create_method(self) -> &'static str {
        match self {
            Self::AlertContact => "newAlertContact",
            Self::Monitor => "newMonitor",
        }
    }

    /// Method that edits an existing record in place.
    pub fn update_method(self) -> &'static str {
        match self {
            Self::AlertContact => "editAlertContact",
            Self::Monitor => "editMonitor",
        }
    }

    /// Method that deletes a record by id.
    pub fn delete_method(self) -> &'static str {
        match self {
            Self::AlertContact => "deleteAlertContact",
            Self::Monitor => "deleteMonitor",
        }
    }

    /// Key of the record array in the list response envelope.
    pub fn records_key(self) -> &'static str {
        match self {
            Self::AlertContact => "alert_contacts",
            Self::Monitor => "monitors",
        }
    }

    /// Key of the created-object payload in the create response.
    pub fn created_key(self) -> &'static str {
        match self {
            Self::AlertContact => "alertcontact",
            Self::Monitor => "monitor",
        }
    }
}

// ── ServerId ────────────────────────────────────────────────────────

/// Opaque identifier assigned by the server.
///
/// Always stored as text: the API hands out ids with significant
/// leading zeros, which a numeric type would destroy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract an id from a JSON value, accepting either the string
    /// form (leading zeros preserved) or a bare number.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ServerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── Params ──────────────────────────────────────────────────────────

/// Ordered form parameters for a single API call.
///
/// The client appends its own authentication and format parameters;
/// callers only supply method-specific ones.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(&'static str, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.0.push((key, value.into()));
    }

    /// Append a parameter, builder-style.
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Set a parameter, replacing any existing value for the key.
    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.into(),
            None => self.push(key, value),
        }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_id_preserves_leading_zeros() {
        let id = ServerId::from_value(&json!("012345")).unwrap();
        assert_eq!(id.as_str(), "012345");
    }

    #[test]
    fn server_id_accepts_numbers() {
        let id = ServerId::from_value(&json!(515)).unwrap();
        assert_eq!(id.as_str(), "515");
    }

    #[test]
    fn server_id_rejects_other_shapes() {
        assert!(ServerId::from_value(&json!(["012345"])).is_none());
        assert!(ServerId::from_value(&json!(null)).is_none());
    }

    #[test]
    fn params_set_replaces_existing_key() {
        let mut params = Params::new().with("offset", "0");
        params.set("offset", "50");
        params.set("limit", "25");
        assert_eq!(
            params.pairs(),
            &[("offset", "50".to_owned()), ("limit", "25".to_owned())]
        );
    }
}
