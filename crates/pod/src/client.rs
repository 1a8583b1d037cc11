//! HTTP POD client backed by reqwest.

use crate::{AclStore, PodStore};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;
use waymark_core::error::{WaymarkError, WaymarkResult};
use waymark_core::{Mode, PermissionEntry};

/// Route documents live under this container, relative to the POD root.
const ROUTE_CONTAINER: &str = "viade/routes/";

/// The trusted-app registry document, relative to the POD root.
const APP_REGISTRY: &str = "settings/app-permissions.json";

/// Talks to a Solid POD over HTTP.
///
/// ```ignore
/// let client = HttpPodClient::connect("https://alice.solidcommunity.net/")?;
/// ```
pub struct HttpPodClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpPodClient {
    pub fn connect(base_url: &str) -> WaymarkResult<Self> {
        if base_url.is_empty() {
            return Err(WaymarkError::InvalidInput("POD URL must not be empty".into()));
        }

        let base_url = Url::parse(base_url)
            .map_err(|e| WaymarkError::InvalidInput(format!("Invalid POD URL {base_url}: {e}")))?;

        tracing::info!(pod_url = %base_url, "connected");

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Absolute URLs pass through; relative paths resolve against the base.
    fn resolve(&self, path: &str) -> WaymarkResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| WaymarkError::InvalidInput(format!("Invalid resource path {path}: {e}")))
    }

    async fn get_json(&self, url: Url) -> WaymarkResult<Value> {
        self.http
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| WaymarkError::Store(format!("Failed to fetch {url}: {e}")))?
            .json()
            .await
            .map_err(|e| WaymarkError::Document(format!("Malformed document at {url}: {e}")))
    }
}

/// A WebID like `https://host/profile/card#me` maps to the POD root
/// `https://host/`.
pub(crate) fn pod_root(web_id: &str) -> &str {
    web_id.strip_suffix("profile/card#me").unwrap_or(web_id)
}

#[derive(Deserialize)]
struct RouteListing {
    files: Vec<RouteFile>,
}

#[derive(Deserialize)]
struct RouteFile {
    url: String,
}

#[derive(Deserialize)]
struct AppRegistryDoc {
    permissions: Option<Vec<Mode>>,
}

#[async_trait]
impl AclStore for HttpPodClient {
    async fn get_permissions(
        &self,
        web_id: &str,
        resource_path: &str,
        acl_path: &str,
    ) -> WaymarkResult<Vec<PermissionEntry>> {
        tracing::debug!(web_id, resource_path, acl_path, "fetching permissions");

        let url = self.resolve(acl_path)?;
        let entries: Vec<PermissionEntry> = self
            .http
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| WaymarkError::Store(format!("Failed to fetch ACL {acl_path}: {e}")))?
            .json()
            .await
            .map_err(|e| WaymarkError::Store(format!("Malformed ACL at {acl_path}: {e}")))?;

        tracing::debug!(acl_path, entries = entries.len(), "fetched permissions");
        Ok(entries)
    }

    async fn create_acl(
        &self,
        web_id: &str,
        resource_path: &str,
        acl_path: &str,
        entries: &[PermissionEntry],
    ) -> WaymarkResult<()> {
        tracing::debug!(
            web_id,
            resource_path,
            acl_path,
            entries = entries.len(),
            "replacing ACL"
        );

        let url = self.resolve(acl_path)?;
        self.http
            .put(url)
            .json(entries)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| WaymarkError::Store(format!("Failed to write ACL {acl_path}: {e}")))?;

        tracing::info!(acl_path, entries = entries.len(), "ACL replaced");
        Ok(())
    }
}

#[async_trait]
impl PodStore for HttpPodClient {
    async fn get_document(&self, url: &str) -> WaymarkResult<Value> {
        let url = self.resolve(url)?;
        tracing::debug!(%url, "fetching document");
        self.get_json(url).await
    }

    async fn put_document(&self, url: &str, document: &Value) -> WaymarkResult<()> {
        let url = self.resolve(url)?;
        tracing::debug!(%url, "storing document");

        self.http
            .put(url.clone())
            .json(document)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| WaymarkError::Store(format!("Failed to store {url}: {e}")))?;

        tracing::info!(%url, "document stored");
        Ok(())
    }

    async fn list_routes(&self, web_id: &str) -> WaymarkResult<Vec<String>> {
        let container = format!("{}{ROUTE_CONTAINER}", pod_root(web_id));
        let url = self.resolve(&container)?;

        tracing::debug!(web_id, %url, "listing routes");

        let listing: RouteListing = serde_json::from_value(self.get_json(url).await?)
            .map_err(|e| WaymarkError::Document(format!("Malformed route listing: {e}")))?;

        Ok(listing.files.into_iter().map(|f| f.url).collect())
    }

    async fn get_app_permissions(&self, web_id: &str) -> WaymarkResult<Option<Vec<Mode>>> {
        let registry = format!("{}{APP_REGISTRY}", pod_root(web_id));
        let url = self.resolve(&registry)?;

        tracing::debug!(web_id, %url, "fetching app registry");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| WaymarkError::Store(format!("Failed to fetch app registry: {e}")))?;

        // An absent registry entry is a normal "nothing granted yet".
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::warn!(web_id, "app registry not found");
            return Ok(None);
        }

        let doc: AppRegistryDoc = response
            .error_for_status()
            .map_err(|e| WaymarkError::Store(format!("Failed to fetch app registry: {e}")))?
            .json()
            .await
            .map_err(|e| WaymarkError::Document(format!("Malformed app registry: {e}")))?;

        Ok(doc.permissions)
    }
}
