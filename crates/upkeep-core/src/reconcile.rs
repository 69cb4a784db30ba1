// ── Reconciliation engine ──
//
// One generic diff-and-apply pass, parameterized by entity kind.
// Desired state is matched against fetched state by identity; drift
// becomes update calls, except where the immutable `type` field
// changed, which forces delete + recreate. Obsolete records are
// deleted, missing ones created last. Dry-run computes and logs the
// same decisions but issues no mutating call.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info};
use upkeep_api::{ApiClient, Params, Resource, ServerId};

use crate::error::SyncError;

/// The seam between the engine and the two entity kinds: everything
/// the diff needs to know about an entity, and nothing else.
pub(crate) trait Syncable: PartialEq + fmt::Debug + Sized {
    const RESOURCE: Resource;
    const KIND: &'static str;

    /// Build a transient mirror entity from a fetched record.
    fn from_record(fields: &Map<String, Value>) -> Result<Self, SyncError>;

    /// Extra parameters for the list call.
    fn list_params() -> Params {
        Params::new()
    }

    fn identity(&self) -> &str;
    fn server_id(&self) -> Option<&ServerId>;
    fn assign_server_id(&mut self, id: ServerId);

    /// The immutable discriminator: the API refuses to change it via
    /// update, so a difference here forces delete + recreate.
    fn type_code(&self) -> i64;

    fn create_params(&self) -> Params;
    fn update_params(&self) -> Params;
}

/// Actions applied (or, in dry-run, that would have been applied)
/// while reconciling one entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindSummary {
    pub created: usize,
    pub updated: usize,
    /// Entities whose `type` changed: deleted and recreated.
    pub replaced: usize,
    pub deleted: usize,
}

impl KindSummary {
    /// True when the remote state already matched the desired state.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Converge the remote set of one entity kind to `desired`.
///
/// Fetched records are walked in server order, emitting updates and
/// deletes as encountered; creates for identities the server doesn't
/// know yet run last, in declaration order. Server ids are copied onto
/// matched desired entities before any comparison, and creates store
/// the returned id, so later stages can resolve references.
pub(crate) async fn reconcile<T: Syncable>(
    api: &ApiClient,
    desired: &mut IndexMap<String, T>,
    dry_run: bool,
) -> Result<KindSummary, SyncError> {
    let fetched = api.fetch_all(T::RESOURCE, &T::list_params()).await?;

    let mut summary = KindSummary::default();
    let mut reconciled: HashSet<String> = HashSet::with_capacity(desired.len());

    for record in &fetched {
        let existing = T::from_record(record)?;
        match desired.get_mut(existing.identity()) {
            Some(want) => {
                reconciled.insert(existing.identity().to_owned());
                // The server id is needed downstream whether or not
                // this entity drifted.
                if let Some(id) = existing.server_id() {
                    want.assign_server_id(id.clone());
                }
                if *want != existing {
                    if want.type_code() == existing.type_code() {
                        update(api, &existing, want, dry_run).await?;
                        summary.updated += 1;
                    } else {
                        info!(
                            "{} type can't be edited in place, replacing {}",
                            T::KIND,
                            existing.identity()
                        );
                        delete(api, &existing, dry_run).await?;
                        create(api, want, dry_run).await?;
                        summary.replaced += 1;
                    }
                }
            }
            None => {
                delete(api, &existing, dry_run).await?;
                summary.deleted += 1;
            }
        }
    }

    for (identity, want) in desired.iter_mut() {
        if !reconciled.contains(identity) {
            create(api, want, dry_run).await?;
            summary.created += 1;
        }
    }

    Ok(summary)
}

async fn create<T: Syncable>(api: &ApiClient, want: &mut T, dry_run: bool) -> Result<(), SyncError> {
    info!("creating {} {}", T::KIND, want.identity());
    if dry_run {
        return Ok(());
    }
    let id = api.create(T::RESOURCE, &want.create_params()).await?;
    want.assign_server_id(id);
    Ok(())
}

async fn update<T: Syncable>(
    api: &ApiClient,
    existing: &T,
    want: &T,
    dry_run: bool,
) -> Result<(), SyncError> {
    info!("updating {} {}", T::KIND, want.identity());
    debug!("existing: {existing:?}");
    debug!("desired: {want:?}");
    if dry_run {
        return Ok(());
    }
    let id = existing.server_id().cloned().unwrap_or_default();
    api.update(T::RESOURCE, &id, &want.update_params()).await?;
    Ok(())
}

async fn delete<T: Syncable>(api: &ApiClient, existing: &T, dry_run: bool) -> Result<(), SyncError> {
    info!("deleting {} {}", T::KIND, existing.identity());
    if dry_run {
        return Ok(());
    }
    let id = existing.server_id().cloned().unwrap_or_default();
    api.delete(T::RESOURCE, &id).await?;
    Ok(())
}
