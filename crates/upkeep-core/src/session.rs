// ── Sync session ──
//
// The `Upkeep` session owns the desired configuration for one sync
// run: callers declare contacts and monitors, wire them together, then
// call `sync()`. Contacts reconcile strictly before monitors — monitor
// assignments embed contact server ids, which only exist once the
// contact phase has run.

use std::time::Duration;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;
use upkeep_api::ApiClient;

use crate::config::SyncOptions;
use crate::error::SyncError;
use crate::model::{Contact, ContactRef, Monitor};
use crate::reconcile::{KindSummary, reconcile};

/// Actions applied (or computed, in dry-run) across one `sync()` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub contacts: KindSummary,
    pub monitors: KindSummary,
}

impl SyncSummary {
    /// True when the remote account already matched the declarations.
    pub fn is_noop(&self) -> bool {
        self.contacts.is_noop() && self.monitors.is_noop()
    }
}

/// A declarative configuration session.
///
/// Declare every contact and monitor the account should have, then
/// call [`sync`](Self::sync) to converge the account to exactly that
/// set — anything remote that wasn't declared here gets deleted.
pub struct Upkeep {
    api: ApiClient,
    dry_run: bool,
    default_interval: Duration,
    contacts: IndexMap<String, Contact>,
    monitors: IndexMap<String, Monitor>,
}

impl Upkeep {
    /// Create a session from explicit options. No remote call is made
    /// until [`sync`](Self::sync).
    pub fn new(options: SyncOptions) -> Result<Self, SyncError> {
        let api = ApiClient::new(
            options.base_url.as_str(),
            options.api_key,
            &options.transport,
        )?;
        Ok(Self {
            api,
            dry_run: options.dry_run,
            default_interval: options.default_interval,
            contacts: IndexMap::new(),
            monitors: IndexMap::new(),
        })
    }

    // ── Contact declarations ─────────────────────────────────────────

    /// Declare a contact of an arbitrary type code.
    ///
    /// The typed helpers below cover the types the create endpoint
    /// supports; this is also the escape hatch for contact types that
    /// must be created in the web UI but can still be referenced by
    /// monitors once declared here.
    pub fn contact(
        &mut self,
        type_code: i64,
        value: &str,
        friendly_name: &str,
    ) -> Result<ContactRef, SyncError> {
        let contact = Contact::new(type_code, value, friendly_name);
        if self.contacts.contains_key(contact.identity()) {
            return Err(SyncError::DuplicateIdentity {
                kind: "contact",
                identity: contact.identity().to_owned(),
            });
        }
        debug!("declared contact {}", contact.identity());
        let handle = ContactRef::new(contact.identity());
        self.contacts.insert(contact.identity().to_owned(), contact);
        Ok(handle)
    }

    /// Declare an e-mail contact. The display name defaults to the
    /// address itself.
    pub fn email_contact(&mut self, email: &str, name: &str) -> Result<ContactRef, SyncError> {
        let name = if name.is_empty() { email } else { name };
        self.contact(Contact::TYPE_EMAIL, email, name)
    }

    /// Declare an SMS contact.
    pub fn sms_contact(&mut self, number: &str, name: &str) -> Result<ContactRef, SyncError> {
        self.contact(Contact::TYPE_SMS, number, name)
    }

    /// Declare a Twitter DM contact.
    pub fn twitter_dm_contact(&mut self, value: &str, name: &str) -> Result<ContactRef, SyncError> {
        self.contact(Contact::TYPE_TWITTER_DM, value, name)
    }

    /// Declare a Boxcar contact.
    pub fn boxcar_contact(&mut self, key: &str, name: &str) -> Result<ContactRef, SyncError> {
        self.contact(Contact::TYPE_BOXCAR, key, name)
    }

    /// Declare a webhook contact.
    pub fn webhook_contact(&mut self, value: &str, name: &str) -> Result<ContactRef, SyncError> {
        self.contact(Contact::TYPE_WEBHOOK, value, name)
    }

    /// Declare a Pushbullet contact.
    pub fn pushbullet_contact(&mut self, value: &str, name: &str) -> Result<ContactRef, SyncError> {
        self.contact(Contact::TYPE_PUSHBULLET, value, name)
    }

    /// Declare a Pushover contact.
    pub fn pushover_contact(&mut self, value: &str, name: &str) -> Result<ContactRef, SyncError> {
        self.contact(Contact::TYPE_PUSHOVER, value, name)
    }

    // ── Monitor declarations ─────────────────────────────────────────

    /// Declare a plain HTTP(S) availability monitor.
    ///
    /// Returns the monitor for chained options and contact assignment.
    pub fn http_monitor(&mut self, name: &str, url: &str) -> Result<&mut Monitor, SyncError> {
        let monitor = Monitor::http(name, url, self.default_interval);
        self.insert_monitor(monitor)
    }

    /// Declare a keyword monitor: fetch `url` and alert on `keyword`.
    pub fn keyword_monitor(
        &mut self,
        name: &str,
        url: &str,
        keyword: &str,
    ) -> Result<&mut Monitor, SyncError> {
        let monitor = Monitor::keyword(name, url, keyword, self.default_interval);
        self.insert_monitor(monitor)
    }

    /// Declare a TCP port monitor against `hostname:port`.
    pub fn port_monitor(
        &mut self,
        name: &str,
        hostname: &str,
        port: u16,
    ) -> Result<&mut Monitor, SyncError> {
        let monitor = Monitor::port(name, hostname, port, self.default_interval);
        self.insert_monitor(monitor)
    }

    fn insert_monitor(&mut self, monitor: Monitor) -> Result<&mut Monitor, SyncError> {
        debug!("declared monitor {}", monitor.identity());
        match self.monitors.entry(monitor.identity().to_owned()) {
            Entry::Occupied(_) => Err(SyncError::DuplicateIdentity {
                kind: "monitor",
                identity: monitor.identity().to_owned(),
            }),
            Entry::Vacant(slot) => Ok(slot.insert(monitor)),
        }
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Declared contacts, in declaration order. After a successful
    /// (non-dry-run) `sync()`, every one carries its server id.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    /// Declared monitors, in declaration order.
    pub fn monitors(&self) -> impl Iterator<Item = &Monitor> {
        self.monitors.values()
    }

    // ── Sync ─────────────────────────────────────────────────────────

    /// Converge the remote account to the declared configuration.
    ///
    /// Contacts reconcile first; once their server ids are resolved,
    /// every monitor's assignment string is materialized, then monitors
    /// reconcile. The first error aborts the remainder of the run;
    /// mutations already applied stand.
    pub async fn sync(&mut self) -> Result<SyncSummary, SyncError> {
        let contacts = reconcile(&self.api, &mut self.contacts, self.dry_run).await?;

        for monitor in self.monitors.values_mut() {
            monitor.resolve_contacts(&self.contacts)?;
        }

        let monitors = reconcile(&self.api, &mut self.monitors, self.dry_run).await?;

        Ok(SyncSummary { contacts, monitors })
    }
}
