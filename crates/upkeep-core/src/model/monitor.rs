// Monitor entity and contact association.

use std::time::Duration;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use upkeep_api::{Params, Resource, ServerId};

use crate::error::SyncError;
use crate::model::contact::{Contact, ContactRef};
use crate::model::record::RawRecord;
use crate::reconcile::Syncable;

/// One contact assignment on a monitor: who to alert, after how many
/// minutes of downtime, and how often to repeat.
#[derive(Debug, Clone)]
struct Assignment {
    contact: String,
    threshold: i64,
    recurrence: i64,
}

/// A monitor: one check the service runs against a target.
///
/// Identified by its friendly name. Fields not applicable to a
/// monitor's type stay at their defaults and are omitted from API
/// parameters — the API treats zero/empty as "not set", and so does
/// equality here.
#[derive(Debug, Clone)]
pub struct Monitor {
    friendly_name: String,
    url: String,
    monitor_type: i64,
    sub_type: i64,
    keyword_type: i64,
    keyword_value: String,
    http_username: String,
    http_password: String,
    port: i64,
    interval: i64,
    http_auth_type: i64,
    http_method: i64,
    post_type: i64,
    post_value: String,
    post_content_type: i64,
    server_id: Option<ServerId>,
    /// Assignments declared locally via `add_contacts`.
    assignments: Vec<Assignment>,
    /// Canonical assignment string: taken verbatim from a fetched
    /// record, or materialized from `assignments` once contact ids are
    /// known. `None` until one of those happens.
    alert_contacts: Option<String>,
}

impl Monitor {
    // Monitor type codes, from https://uptimerobot.com/api
    pub const TYPE_HTTP: i64 = 1;
    pub const TYPE_KEYWORD: i64 = 2;
    pub const TYPE_PORT: i64 = 4;

    fn blank(friendly_name: String, url: String, monitor_type: i64, interval: Duration) -> Self {
        Self {
            friendly_name,
            url,
            monitor_type,
            sub_type: 0,
            keyword_type: 0,
            keyword_value: String::new(),
            http_username: String::new(),
            http_password: String::new(),
            port: 0,
            interval: interval_secs(interval),
            http_auth_type: 0,
            http_method: 0,
            post_type: 0,
            post_value: String::new(),
            post_content_type: 0,
            server_id: None,
            assignments: Vec::new(),
            alert_contacts: None,
        }
    }

    /// A plain HTTP(S) availability check.
    pub(crate) fn http(name: impl Into<String>, url: impl Into<String>, interval: Duration) -> Self {
        Self::blank(name.into(), url.into(), Self::TYPE_HTTP, interval)
    }

    /// A keyword check: fetch `url` and look for `keyword` in the body.
    pub(crate) fn keyword(
        name: impl Into<String>,
        url: impl Into<String>,
        keyword: impl Into<String>,
        interval: Duration,
    ) -> Self {
        let mut monitor = Self::blank(name.into(), url.into(), Self::TYPE_KEYWORD, interval);
        monitor.keyword_value = keyword.into();
        // Alert when the keyword exists, unless overridden.
        monitor.keyword_type = 2;
        monitor
    }

    /// A TCP port check against `hostname:port`.
    pub(crate) fn port(
        name: impl Into<String>,
        hostname: impl Into<String>,
        port: u16,
        interval: Duration,
    ) -> Self {
        let mut monitor = Self::blank(name.into(), hostname.into(), Self::TYPE_PORT, interval);
        monitor.sub_type = port_sub_type(port);
        monitor.port = i64::from(port);
        monitor
    }

    /// Build a monitor from a fetched record. When the record carries
    /// an `alert_contacts` array (fetched with `alert_contacts=1`),
    /// its entries are rendered into the canonical assignment string.
    pub(crate) fn from_record(fields: &Map<String, Value>) -> Result<Self, SyncError> {
        let record = RawRecord::new("monitor", fields);
        record.require(&["friendly_name", "url", "type"])?;
        let mut monitor = Self {
            friendly_name: record.string("friendly_name")?,
            url: record.string("url")?,
            monitor_type: record.integer("type")?,
            sub_type: record.integer("sub_type")?,
            keyword_type: record.integer("keyword_type")?,
            keyword_value: record.string("keyword_value")?,
            http_username: record.string("http_username")?,
            http_password: record.string("http_password")?,
            port: record.integer("port")?,
            interval: record.integer("interval")?,
            http_auth_type: record.integer("http_auth_type")?,
            http_method: record.integer("http_method")?,
            post_type: record.integer("post_type")?,
            post_value: record.string("post_value")?,
            post_content_type: record.integer("post_content_type")?,
            server_id: record.server_id(),
            assignments: Vec::new(),
            alert_contacts: None,
        };
        if let Some(value) = fields.get("alert_contacts") {
            monitor.alert_contacts = Some(render_fetched_assignments(value)?);
        }
        Ok(monitor)
    }

    // ── Declaration-time options ─────────────────────────────────────

    /// Use HTTP basic auth when probing.
    pub fn http_auth(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> &mut Self {
        self.http_username = username.into();
        self.http_password = password.into();
        self
    }

    /// Override the monitoring interval for this monitor.
    pub fn interval(&mut self, interval: Duration) -> &mut Self {
        self.interval = interval_secs(interval);
        self
    }

    /// For keyword monitors: whether the keyword is expected to exist
    /// (the default) or to be absent.
    pub fn keyword_should_exist(&mut self, should_exist: bool) -> &mut Self {
        self.keyword_type = if should_exist { 2 } else { 1 };
        self
    }

    /// Alert the given contacts, with threshold and recurrence zero.
    pub fn add_contacts(&mut self, contacts: &[&ContactRef]) -> &mut Self {
        self.add_contacts_with(contacts, 0, 0)
    }

    /// Alert the given contacts after `threshold` minutes of downtime,
    /// repeating every `recurrence` minutes (zero: service defaults).
    pub fn add_contacts_with(
        &mut self,
        contacts: &[&ContactRef],
        threshold: i64,
        recurrence: i64,
    ) -> &mut Self {
        for contact in contacts {
            self.assignments.push(Assignment {
                contact: contact.identity().to_owned(),
                threshold,
                recurrence,
            });
        }
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The stable key this monitor is matched by across runs.
    pub fn identity(&self) -> &str {
        &self.friendly_name
    }

    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn monitor_type(&self) -> i64 {
        self.monitor_type
    }

    pub fn server_id(&self) -> Option<&ServerId> {
        self.server_id.as_ref()
    }

    // ── Assignment resolution ────────────────────────────────────────

    /// Materialize the canonical assignment string from the declared
    /// assignments, resolving contact ids against this session's
    /// contact set. Contacts without a resolved id (dry-run creations)
    /// render as the empty string.
    ///
    /// Must run after contacts are reconciled and before monitors are
    /// compared; the session guarantees the ordering.
    pub(crate) fn resolve_contacts(
        &mut self,
        contacts: &IndexMap<String, Contact>,
    ) -> Result<(), SyncError> {
        let mut rendered = Vec::with_capacity(self.assignments.len());
        for assignment in &self.assignments {
            let contact = contacts.get(assignment.contact.as_str()).ok_or_else(|| {
                SyncError::UnknownContact {
                    monitor: self.friendly_name.clone(),
                    contact: assignment.contact.clone(),
                }
            })?;
            let id = contact.server_id().map_or("", ServerId::as_str);
            rendered.push(render_assignment(id, assignment.threshold, assignment.recurrence));
        }
        rendered.sort_unstable();
        self.alert_contacts = Some(rendered.join("-"));
        Ok(())
    }

    /// The canonical assignment string; empty until resolved or fetched.
    pub(crate) fn contacts_str(&self) -> &str {
        self.alert_contacts.as_deref().unwrap_or("")
    }

    fn params(&self, include_type: bool) -> Params {
        let mut params = Params::new();
        push_nonempty(&mut params, "friendly_name", &self.friendly_name);
        push_nonempty(&mut params, "url", &self.url);
        if include_type {
            push_nonzero(&mut params, "type", self.monitor_type);
        }
        push_nonzero(&mut params, "sub_type", self.sub_type);
        push_nonzero(&mut params, "keyword_type", self.keyword_type);
        push_nonempty(&mut params, "keyword_value", &self.keyword_value);
        push_nonempty(&mut params, "http_username", &self.http_username);
        push_nonempty(&mut params, "http_password", &self.http_password);
        push_nonzero(&mut params, "port", self.port);
        push_nonzero(&mut params, "interval", self.interval);
        push_nonzero(&mut params, "http_auth_type", self.http_auth_type);
        push_nonzero(&mut params, "http_method", self.http_method);
        push_nonzero(&mut params, "post_type", self.post_type);
        push_nonempty(&mut params, "post_value", &self.post_value);
        push_nonzero(&mut params, "post_content_type", self.post_content_type);
        params.push("alert_contacts", self.contacts_str());
        params
    }
}

/// Equality over declared fields plus the canonical assignment string;
/// `server_id` never participates.
impl PartialEq for Monitor {
    fn eq(&self, other: &Self) -> bool {
        self.friendly_name == other.friendly_name
            && self.url == other.url
            && self.monitor_type == other.monitor_type
            && self.sub_type == other.sub_type
            && self.keyword_type == other.keyword_type
            && self.keyword_value == other.keyword_value
            && self.http_username == other.http_username
            && self.http_password == other.http_password
            && self.port == other.port
            && self.interval == other.interval
            && self.http_auth_type == other.http_auth_type
            && self.http_method == other.http_method
            && self.post_type == other.post_type
            && self.post_value == other.post_value
            && self.post_content_type == other.post_content_type
            && self.contacts_str() == other.contacts_str()
    }
}

impl Syncable for Monitor {
    const RESOURCE: Resource = Resource::Monitor;
    const KIND: &'static str = "monitor";

    fn from_record(fields: &Map<String, Value>) -> Result<Self, SyncError> {
        Self::from_record(fields)
    }

    fn list_params() -> Params {
        // Ask the server to include contact assignments in records.
        Params::new().with("alert_contacts", "1")
    }

    fn identity(&self) -> &str {
        self.identity()
    }

    fn server_id(&self) -> Option<&ServerId> {
        self.server_id.as_ref()
    }

    fn assign_server_id(&mut self, id: ServerId) {
        self.server_id = Some(id);
    }

    fn type_code(&self) -> i64 {
        self.monitor_type
    }

    fn create_params(&self) -> Params {
        self.params(true)
    }

    fn update_params(&self) -> Params {
        // `type` is immutable server-side; edits never carry it.
        self.params(false)
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Render one assignment as `{id}_{threshold}_{recurrence}`.
fn render_assignment(id: &str, threshold: i64, recurrence: i64) -> String {
    format!("{id}_{threshold}_{recurrence}")
}

/// Render a fetched `alert_contacts` array into the canonical string:
/// each entry rendered, sorted lexicographically, joined with `-`.
/// Byte-identical to what `resolve_contacts` produces for the same
/// assignments.
fn render_fetched_assignments(value: &Value) -> Result<String, SyncError> {
    let invalid = |reason: String| SyncError::InvalidField {
        kind: "monitor",
        field: "alert_contacts",
        reason,
    };
    let entries = value
        .as_array()
        .ok_or_else(|| invalid(format!("expected an array, got {value}")))?;

    let mut rendered = Vec::with_capacity(entries.len());
    for entry in entries {
        let fields = entry
            .as_object()
            .ok_or_else(|| invalid(format!("expected an object entry, got {entry}")))?;
        let record = RawRecord::new("monitor", fields);
        let id = record.server_id().unwrap_or_default();
        let threshold = record.integer("threshold")?;
        let recurrence = record.integer("recurrence")?;
        rendered.push(render_assignment(id.as_str(), threshold, recurrence));
    }
    rendered.sort_unstable();
    Ok(rendered.join("-"))
}

/// Port-to-subtype map, from https://uptimerobot.com/api; anything
/// else is a custom port.
fn port_sub_type(port: u16) -> i64 {
    match port {
        80 => 1,
        443 => 2,
        21 => 3,
        25 => 4,
        110 => 5,
        143 => 6,
        _ => 99,
    }
}

fn interval_secs(interval: Duration) -> i64 {
    i64::try_from(interval.as_secs()).unwrap_or(i64::MAX)
}

// Param rendering helpers: the API reads zero/empty as "not set", so
// default values are omitted entirely.

fn push_nonempty(params: &mut Params, key: &'static str, value: &str) {
    if !value.is_empty() {
        params.push(key, value);
    }
}

fn push_nonzero(params: &mut Params, key: &'static str, value: i64) {
    if value != 0 {
        params.push(key, value.to_string());
    }
}
