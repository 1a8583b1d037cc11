//! Reconciliation procedure tests against an in-memory ACL store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use waymark_acl::query::has_mode;
use waymark_acl::{Outcome, Reconciler};
use waymark_core::error::{WaymarkError, WaymarkResult};
use waymark_core::{AgentSelector, Mode, ModeSet, PermissionEntry};
use waymark_pod::AclStore;

const WEB_ID: &str = "https://alice.example/profile/card#me";
const ALICE: &str = "https://alice.example/profile#me";

/// In-memory ACL store counting writes.
struct MemoryAclStore {
    entries: Mutex<Vec<PermissionEntry>>,
    writes: AtomicUsize,
}

impl MemoryAclStore {
    fn with_entries(entries: Vec<PermissionEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            writes: AtomicUsize::new(0),
        }
    }

    fn entries(&self) -> Vec<PermissionEntry> {
        self.entries.lock().unwrap().clone()
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AclStore for MemoryAclStore {
    async fn get_permissions(
        &self,
        _web_id: &str,
        _resource_path: &str,
        _acl_path: &str,
    ) -> WaymarkResult<Vec<PermissionEntry>> {
        Ok(self.entries())
    }

    async fn create_acl(
        &self,
        _web_id: &str,
        _resource_path: &str,
        _acl_path: &str,
        entries: &[PermissionEntry],
    ) -> WaymarkResult<()> {
        *self.entries.lock().unwrap() = entries.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Store whose write path always fails.
struct BrokenAclStore;

#[async_trait]
impl AclStore for BrokenAclStore {
    async fn get_permissions(
        &self,
        _web_id: &str,
        _resource_path: &str,
        _acl_path: &str,
    ) -> WaymarkResult<Vec<PermissionEntry>> {
        Ok(Vec::new())
    }

    async fn create_acl(
        &self,
        _web_id: &str,
        _resource_path: &str,
        _acl_path: &str,
        _entries: &[PermissionEntry],
    ) -> WaymarkResult<()> {
        Err(WaymarkError::Store("connection reset".into()))
    }
}

fn modes(m: &[Mode]) -> ModeSet {
    ModeSet::from_modes(m)
}

#[tokio::test]
async fn satisfied_profile_performs_no_write() {
    let store = MemoryAclStore::with_entries(vec![PermissionEntry::everyone(modes(&[
        Mode::Append,
    ]))]);
    let reconciler = Reconciler::new(store, WEB_ID);

    let outcome = reconciler.ensure_append_for_everyone("inbox/").await.unwrap();

    assert_eq!(outcome, Outcome::AlreadyGranted);
    assert_eq!(reconciler.store().writes(), 0);
}

#[tokio::test]
async fn missing_everyone_grant_is_repaired() {
    let store = MemoryAclStore::with_entries(vec![]);
    let reconciler = Reconciler::new(store, WEB_ID);

    let outcome = reconciler.ensure_append_for_everyone("inbox/").await.unwrap();

    assert_eq!(outcome, Outcome::Updated);
    assert_eq!(reconciler.store().writes(), 1);
    assert!(has_mode(
        &reconciler.store().entries(),
        &AgentSelector::Everyone,
        Mode::Append
    ));
}

#[tokio::test]
async fn everyone_read_unions_into_existing_entry() {
    let store = MemoryAclStore::with_entries(vec![PermissionEntry::everyone(modes(&[
        Mode::Append,
    ]))]);
    let reconciler = Reconciler::new(store, WEB_ID);

    reconciler.ensure_read_for_everyone("settings/").await.unwrap();

    let entries = reconciler.store().entries();
    // Still one everyone entry, now granting both modes.
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].modes, modes(&[Mode::Append, Mode::Read]));
}

#[tokio::test]
async fn everyone_template_spawns_agent_entry() {
    let everyone = PermissionEntry::everyone(modes(&[Mode::Read]));
    let store = MemoryAclStore::with_entries(vec![everyone.clone()]);
    let reconciler = Reconciler::new(store, WEB_ID);

    let outcome = reconciler
        .ensure_read_for_agent("viade/routes/r1.jsonld", ALICE)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Updated);
    let entries = reconciler.store().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], everyone);
    assert_eq!(entries[1], PermissionEntry::for_agent(ALICE, modes(&[Mode::Read])));
}

#[tokio::test]
async fn read_write_grant_lands_on_one_entry() {
    let store = MemoryAclStore::with_entries(vec![PermissionEntry::for_agent(
        "bob",
        modes(&[Mode::Read]),
    )]);
    let reconciler = Reconciler::new(store, WEB_ID);

    let outcome = reconciler
        .ensure_read_write_for_agent("viade/routes/r1.jsonld", ALICE)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Updated);
    let entries = reconciler.store().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].modes, modes(&[Mode::Read, Mode::Write]));
    assert!(entries[0].names_agent("bob"));
    assert!(entries[0].names_agent(ALICE));

    let selector = AgentSelector::agent(ALICE);
    assert!(has_mode(&entries, &selector, Mode::Read));
    assert!(has_mode(&entries, &selector, Mode::Write));
}

#[tokio::test]
async fn existing_agent_grant_skips_write() {
    let store = MemoryAclStore::with_entries(vec![PermissionEntry::for_agent(
        "carol",
        modes(&[Mode::Read]),
    )]);
    let reconciler = Reconciler::new(store, WEB_ID);

    let outcome = reconciler
        .ensure_read_for_agent("viade/routes/r1.jsonld", "carol")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::AlreadyGranted);
    assert_eq!(reconciler.store().writes(), 0);
}

#[tokio::test]
async fn read_write_upgrade_repeats_agent_identifier() {
    // bob already reads; the read-write repair reuses his entry as the
    // template and appends him again. The repeat is pinned deliberately;
    // deduplication would be a behavior change.
    let store = MemoryAclStore::with_entries(vec![PermissionEntry::for_agent(
        "bob",
        modes(&[Mode::Read]),
    )]);
    let reconciler = Reconciler::new(store, WEB_ID);

    let outcome = reconciler
        .ensure_read_write_for_agent("viade/routes/r1.jsonld", "bob")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Updated);
    let entries = reconciler.store().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].agents.as_deref(),
        Some(&["bob".to_string(), "bob".to_string()][..])
    );
    assert_eq!(entries[0].modes, modes(&[Mode::Read, Mode::Write]));
}

#[tokio::test]
async fn repair_is_idempotent() {
    let store = MemoryAclStore::with_entries(vec![]);
    let reconciler = Reconciler::new(store, WEB_ID);

    assert_eq!(
        reconciler.ensure_read_for_agent("r", ALICE).await.unwrap(),
        Outcome::Updated
    );
    let after_first = reconciler.store().entries();

    assert_eq!(
        reconciler.ensure_read_for_agent("r", ALICE).await.unwrap(),
        Outcome::AlreadyGranted
    );

    assert_eq!(reconciler.store().writes(), 1);
    assert_eq!(reconciler.store().entries(), after_first);
}

#[tokio::test]
async fn write_failure_propagates() {
    let reconciler = Reconciler::new(BrokenAclStore, WEB_ID);

    let err = reconciler
        .ensure_read_for_agent("r", ALICE)
        .await
        .unwrap_err();

    assert!(matches!(err, WaymarkError::Store(_)));
}
