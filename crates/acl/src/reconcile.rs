//! Reconciliation procedures: ensure a resource's ACL grants a required
//! permission profile, repairing the entry list when it does not.
//!
//! Each procedure is one async read-modify-write: fetch the current entry
//! list, check the required profile, and replace the list only when the
//! profile is missing. There is no locking or versioning around the ACL
//! resource, so two concurrent repairs of the same resource can lose the
//! earlier write. Callers needing stronger guarantees must serialize calls
//! per resource path.

use waymark_core::error::WaymarkResult;
use waymark_core::{AgentSelector, Mode, ModeSet};
use waymark_pod::AclStore;

use crate::merge::merge_modes;
use crate::query::has_all_modes;

/// The companion ACL resource of `resource_path`.
pub fn acl_path(resource_path: &str) -> String {
    format!("{resource_path}.acl")
}

/// Result of one reconciliation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The required profile was already granted; nothing was written.
    AlreadyGranted,
    /// The entry list was repaired and persisted.
    Updated,
}

/// Repairs per-resource ACLs through an injected store client.
///
/// ```ignore
/// let reconciler = Reconciler::new(client, "https://alice.example/profile/card#me");
/// reconciler.ensure_append_for_everyone("viade/inbox/").await?;
/// ```
pub struct Reconciler<S> {
    store: S,
    web_id: String,
}

impl<S: AclStore> Reconciler<S> {
    pub fn new(store: S, web_id: impl Into<String>) -> Self {
        Self {
            store,
            web_id: web_id.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Everyone may append to the resource (inbox repair).
    pub async fn ensure_append_for_everyone(&self, resource_path: &str) -> WaymarkResult<Outcome> {
        self.ensure(
            resource_path,
            AgentSelector::Everyone,
            ModeSet::from_modes(&[Mode::Append]),
        )
        .await
    }

    /// Everyone may read the resource (public settings).
    pub async fn ensure_read_for_everyone(&self, resource_path: &str) -> WaymarkResult<Outcome> {
        self.ensure(
            resource_path,
            AgentSelector::Everyone,
            ModeSet::from_modes(&[Mode::Read]),
        )
        .await
    }

    /// A specific agent may read the resource (route sharing).
    pub async fn ensure_read_for_agent(
        &self,
        resource_path: &str,
        agent: &str,
    ) -> WaymarkResult<Outcome> {
        self.ensure(
            resource_path,
            AgentSelector::agent(agent),
            ModeSet::from_modes(&[Mode::Read]),
        )
        .await
    }

    /// A specific agent may read and write the resource (collaboration).
    pub async fn ensure_read_write_for_agent(
        &self,
        resource_path: &str,
        agent: &str,
    ) -> WaymarkResult<Outcome> {
        self.ensure(
            resource_path,
            AgentSelector::agent(agent),
            ModeSet::from_modes(&[Mode::Read, Mode::Write]),
        )
        .await
    }

    async fn ensure(
        &self,
        resource_path: &str,
        selector: AgentSelector,
        required: ModeSet,
    ) -> WaymarkResult<Outcome> {
        let acl_path = acl_path(resource_path);
        let entries = self
            .store
            .get_permissions(&self.web_id, resource_path, &acl_path)
            .await?;

        if has_all_modes(&entries, &selector, &required) {
            tracing::debug!(resource_path, selector = ?selector, "profile already granted");
            return Ok(Outcome::AlreadyGranted);
        }

        let repaired = merge_modes(entries, &selector, &required);
        self.store
            .create_acl(&self.web_id, resource_path, &acl_path, &repaired)
            .await?;

        tracing::info!(
            resource_path,
            selector = ?selector,
            entries = repaired.len(),
            "ACL repaired"
        );
        Ok(Outcome::Updated)
    }
}
