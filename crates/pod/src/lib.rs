//! POD store abstraction and JSON-LD document translation for Waymark.

pub mod client;
pub mod jsonld;

use async_trait::async_trait;
use serde_json::Value;
use waymark_core::error::WaymarkResult;
use waymark_core::{Mode, PermissionEntry};

pub use client::HttpPodClient;

/// Abstraction for reading and replacing a resource's ACL entry list.
///
/// The ACL resource has no partial-update primitive: `create_acl` always
/// replaces the whole list.
#[async_trait]
pub trait AclStore: Send + Sync {
    /// Returns the current entry list of `acl_path`, the companion ACL
    /// resource of `resource_path`.
    async fn get_permissions(
        &self,
        web_id: &str,
        resource_path: &str,
        acl_path: &str,
    ) -> WaymarkResult<Vec<PermissionEntry>>;

    /// Replaces the entire entry list of `acl_path`.
    async fn create_acl(
        &self,
        web_id: &str,
        resource_path: &str,
        acl_path: &str,
        entries: &[PermissionEntry],
    ) -> WaymarkResult<()>;
}

/// Abstraction for fetching and persisting JSON-LD documents on a POD.
#[async_trait]
pub trait PodStore: Send + Sync {
    async fn get_document(&self, url: &str) -> WaymarkResult<Value>;

    async fn put_document(&self, url: &str, document: &Value) -> WaymarkResult<()>;

    /// URLs of every route document in the user's route container.
    async fn list_routes(&self, web_id: &str) -> WaymarkResult<Vec<String>>;

    /// Modes the POD's trusted-app registry grants this application.
    /// `None` when the registry entry is absent.
    async fn get_app_permissions(&self, web_id: &str) -> WaymarkResult<Option<Vec<Mode>>>;
}
