// Field coercion for raw records fetched from the API.
//
// The API serializes loosely: integers may arrive as strings, optional
// fields may be absent, null, zero, or empty — all of which mean "not
// set". Coercion normalizes every field to its declared type, with
// zero/empty as the default. Leading zeros in ids are significant, so
// ids are only ever handled as text.

use serde_json::{Map, Value};
use upkeep_api::ServerId;

use crate::error::SyncError;

/// View over one fetched record, with typed field access.
pub(crate) struct RawRecord<'a> {
    kind: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> RawRecord<'a> {
    pub(crate) fn new(kind: &'static str, fields: &'a Map<String, Value>) -> Self {
        Self { kind, fields }
    }

    /// Presence check for required fields. A present-but-empty value
    /// satisfies it; the default is kept in that case.
    pub(crate) fn require(&self, names: &[&'static str]) -> Result<(), SyncError> {
        for name in names {
            if !self.fields.contains_key(*name) {
                return Err(SyncError::MissingField {
                    kind: self.kind,
                    field: name,
                });
            }
        }
        Ok(())
    }

    /// Coerce a string field. Missing or empty-ish values default to
    /// the empty string; numbers are rendered decimally.
    pub(crate) fn string(&self, name: &'static str) -> Result<String, SyncError> {
        match self.fields.get(name) {
            None => Ok(String::new()),
            Some(value) if is_unset(value) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(self.invalid(name, format!("expected a string, got {other}"))),
        }
    }

    /// Coerce an integer field. Missing or empty-ish values default to
    /// zero; numeric strings are parsed.
    pub(crate) fn integer(&self, name: &'static str) -> Result<i64, SyncError> {
        match self.fields.get(name) {
            None => Ok(0),
            Some(value) if is_unset(value) => Ok(0),
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| self.invalid(name, format!("expected an integer, got {n}"))),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| self.invalid(name, format!("expected an integer, got {s:?}"))),
            Some(other) => Err(self.invalid(name, format!("expected an integer, got {other}"))),
        }
    }

    /// The record's server id, if it carries a usable one.
    pub(crate) fn server_id(&self) -> Option<ServerId> {
        let value = self.fields.get("id")?;
        if is_unset(value) {
            return None;
        }
        ServerId::from_value(value)
    }

    fn invalid(&self, field: &'static str, reason: String) -> SyncError {
        SyncError::InvalidField {
            kind: self.kind,
            field,
            reason,
        }
    }
}

/// Whether a JSON value means "field not set": null, empty string,
/// zero, false, or an empty collection.
fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn integer_accepts_numeric_strings() {
        let fields = record(json!({"port": "25"}));
        let rec = RawRecord::new("monitor", &fields);
        assert_eq!(rec.integer("port").unwrap(), 25);
    }

    #[test]
    fn integer_rejects_garbage() {
        let fields = record(json!({"port": "abc"}));
        let rec = RawRecord::new("monitor", &fields);
        assert!(matches!(
            rec.integer("port"),
            Err(SyncError::InvalidField { field: "port", .. })
        ));
    }

    #[test]
    fn string_renders_numbers() {
        let fields = record(json!({"value": 25}));
        let rec = RawRecord::new("contact", &fields);
        assert_eq!(rec.string("value").unwrap(), "25");
    }

    #[test]
    fn unset_values_keep_defaults() {
        let fields = record(json!({"port": 0, "keyword_value": "", "sub_type": null}));
        let rec = RawRecord::new("monitor", &fields);
        assert_eq!(rec.integer("port").unwrap(), 0);
        assert_eq!(rec.string("keyword_value").unwrap(), "");
        assert_eq!(rec.integer("sub_type").unwrap(), 0);
        assert_eq!(rec.integer("interval").unwrap(), 0);
        assert_eq!(rec.string("url").unwrap(), "");
    }

    #[test]
    fn require_is_a_presence_check() {
        let fields = record(json!({"value": "", "type": 2}));
        let rec = RawRecord::new("contact", &fields);
        assert!(rec.require(&["value", "type"]).is_ok());
        assert!(matches!(
            rec.require(&["friendly_name"]),
            Err(SyncError::MissingField { field: "friendly_name", .. })
        ));
    }

    #[test]
    fn server_id_keeps_leading_zeros() {
        let fields = record(json!({"id": "012345"}));
        let rec = RawRecord::new("contact", &fields);
        assert_eq!(rec.server_id().unwrap().as_str(), "012345");
    }
}
