// Alert contact entity.

use serde_json::{Map, Value};
use upkeep_api::{Params, Resource, ServerId};

use crate::error::SyncError;
use crate::model::record::RawRecord;
use crate::reconcile::Syncable;

/// An alert contact: somewhere the service can send notifications.
///
/// Identified by its `value` (the address, number, key, ...). The
/// server-assigned id is not part of identity or equality; it is
/// populated from fetched records or after creation, and consumed when
/// monitors render their contact assignments.
#[derive(Debug, Clone)]
pub struct Contact {
    value: String,
    contact_type: i64,
    friendly_name: String,
    server_id: Option<ServerId>,
}

impl Contact {
    // Contact type codes, from https://uptimerobot.com/api
    pub const TYPE_SMS: i64 = 1;
    pub const TYPE_EMAIL: i64 = 2;
    pub const TYPE_TWITTER_DM: i64 = 3;
    pub const TYPE_BOXCAR: i64 = 4;
    pub const TYPE_WEBHOOK: i64 = 5;
    pub const TYPE_PUSHBULLET: i64 = 6;
    pub const TYPE_PUSHOVER: i64 = 9;

    pub(crate) fn new(
        contact_type: i64,
        value: impl Into<String>,
        friendly_name: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            contact_type,
            friendly_name: friendly_name.into(),
            server_id: None,
        }
    }

    /// Build a contact from a fetched record.
    pub(crate) fn from_record(fields: &Map<String, Value>) -> Result<Self, SyncError> {
        let record = RawRecord::new("contact", fields);
        record.require(&["value", "type"])?;
        Ok(Self {
            value: record.string("value")?,
            contact_type: record.integer("type")?,
            friendly_name: record.string("friendly_name")?,
            server_id: record.server_id(),
        })
    }

    /// The stable key this contact is matched by across runs.
    pub fn identity(&self) -> &str {
        &self.value
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn contact_type(&self) -> i64 {
        self.contact_type
    }

    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    pub fn server_id(&self) -> Option<&ServerId> {
        self.server_id.as_ref()
    }
}

/// Equality over declared fields only; `server_id` never participates.
impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.contact_type == other.contact_type
            && self.friendly_name == other.friendly_name
    }
}

impl Syncable for Contact {
    const RESOURCE: Resource = Resource::AlertContact;
    const KIND: &'static str = "contact";

    fn from_record(fields: &Map<String, Value>) -> Result<Self, SyncError> {
        Self::from_record(fields)
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
        self.contact_type
    }

    fn create_params(&self) -> Params {
        // Contacts always send all three declared fields, even empty.
        Params::new()
            .with("value", &self.value)
            .with("type", self.contact_type.to_string())
            .with("friendly_name", &self.friendly_name)
    }

    fn update_params(&self) -> Params {
        // `type` is immutable server-side; edits never carry it.
        Params::new()
            .with("value", &self.value)
            .with("friendly_name", &self.friendly_name)
    }
}

/// Handle to a declared contact, returned by the session's contact
/// declarations and consumed by `Monitor::add_contacts`. Cheap to
/// clone; resolves to the contact's server id at sync time.
#[derive(Debug, Clone)]
pub struct ContactRef {
    identity: String,
}

impl ContactRef {
    pub(crate) fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }

    pub(crate) fn identity(&self) -> &str {
        &self.identity
    }
}
