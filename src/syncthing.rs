//! Syncthing REST API access
//!
//! Only two read-only endpoints are used: `/rest/system/config` to find the
//! folder's path, marker and versions location, and `/rest/db/browse` for the
//! recursive listing of everything in Syncthing's index for that folder.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, StfindError};
use crate::remote::BrowseListing;

/// Default address of the local Syncthing GUI/API
pub const DEFAULT_URL: &str = "http://localhost:8384";

const API_KEY_HEADER: &str = "X-API-Key";

/// The parts of `/rest/system/config` this tool reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub folders: Vec<FolderConfig>,
}

/// One folder entry of the Syncthing configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderConfig {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub marker_name: String,

    #[serde(default)]
    pub versioning: Option<VersioningConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersioningConfig {
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl FolderConfig {
    /// Configured `versionsPath`, or empty when versioning does not set one
    pub fn versions_path(&self) -> &str {
        self.versioning
            .as_ref()
            .and_then(|v| v.params.get("versionsPath"))
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }
}

impl SystemConfig {
    /// Find a folder by id, checking that it carries a path and marker name
    pub fn folder(&self, folder_id: &str) -> Result<&FolderConfig> {
        let folder = self
            .folders
            .iter()
            .find(|f| f.id == folder_id && !f.path.is_empty())
            .ok_or_else(|| StfindError::FolderNotFound {
                folder_id: folder_id.to_string(),
            })?;

        if folder.marker_name.is_empty() {
            return Err(StfindError::MissingMarkerName {
                folder_id: folder_id.to_string(),
            });
        }

        Ok(folder)
    }
}

/// Source of folder configuration and folder contents
///
/// The comparison only talks to this trait, so another index (or an
/// in-memory one in tests) can stand in for a live Syncthing.
#[async_trait]
pub trait FolderIndex: Send + Sync {
    /// Look up one folder's configuration
    async fn folder_config(&self, folder_id: &str) -> Result<FolderConfig>;

    /// Recursive listing of everything the index holds for the folder
    async fn browse(&self, folder_id: &str) -> Result<BrowseListing>;
}

/// Client for a Syncthing instance's REST API
pub struct SyncthingClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SyncthingClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full `/rest/system/config` document
    pub async fn system_config(&self) -> Result<SystemConfig> {
        self.get_json("/rest/system/config", &[]).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url).query(query);
        if !self.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, self.api_key.as_str());
        }

        let transport_error = |source: reqwest::Error| StfindError::Transport {
            url: url.clone(),
            source,
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(StfindError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| StfindError::Decode { url, body, source })
    }
}

#[async_trait]
impl FolderIndex for SyncthingClient {
    async fn folder_config(&self, folder_id: &str) -> Result<FolderConfig> {
        let config = self.system_config().await?;
        let folder = config.folder(folder_id)?.clone();
        info!(
            "Folder '{}' is at {} (marker {})",
            folder_id, folder.path, folder.marker_name
        );
        Ok(folder)
    }

    async fn browse(&self, folder_id: &str) -> Result<BrowseListing> {
        self.get_json("/rest/db/browse", &[("folder", folder_id)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_json() -> serde_json::Value {
        json!({
            "version": 37,
            "folders": [
                {
                    "id": "music",
                    "label": "Music",
                    "path": "/data/music/",
                    "markerName": ".stfolder",
                    "versioning": {"type": "", "params": {}}
                },
                {
                    "id": "photos",
                    "path": "/data/photos",
                    "markerName": ".stfolder",
                    "versioning": {
                        "type": "staggered",
                        "params": {"cleanInterval": "3600", "versionsPath": "/backup/photos-old"}
                    }
                }
            ]
        })
    }

    #[test]
    fn test_versions_path_lookup() {
        let config: SystemConfig = serde_json::from_value(config_json()).unwrap();
        assert_eq!(config.folder("music").unwrap().versions_path(), "");
        assert_eq!(
            config.folder("photos").unwrap().versions_path(),
            "/backup/photos-old"
        );
    }

    #[test]
    fn test_missing_versioning_section() {
        let config: SystemConfig = serde_json::from_value(json!({
            "folders": [{"id": "a", "path": "/a", "markerName": ".stfolder"}]
        }))
        .unwrap();
        assert_eq!(config.folder("a").unwrap().versions_path(), "");
    }

    #[test]
    fn test_unknown_folder_and_missing_marker() {
        let config: SystemConfig = serde_json::from_value(json!({
            "folders": [
                {"id": "nomarker", "path": "/a", "markerName": ""},
                {"id": "nopath", "path": "", "markerName": ".stfolder"}
            ]
        }))
        .unwrap();

        assert_matches!(
            config.folder("missing"),
            Err(StfindError::FolderNotFound { .. })
        );
        assert_matches!(
            config.folder("nopath"),
            Err(StfindError::FolderNotFound { .. })
        );
        assert_matches!(
            config.folder("nomarker"),
            Err(StfindError::MissingMarkerName { .. })
        );
    }

    #[tokio::test]
    async fn test_folder_config_sends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/system/config"))
            .and(header("X-API-Key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(config_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = SyncthingClient::new(&format!("{}/", server.uri()), "secret");
        let folder = client.folder_config("photos").await.unwrap();

        assert_eq!(folder.path, "/data/photos");
        assert_eq!(folder.marker_name, ".stfolder");
    }

    #[tokio::test]
    async fn test_browse_passes_folder_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/db/browse"))
            .and(query_param("folder", "music"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"album": {"track.flac": ["2024-01-01T00:00:00Z", 5]}})),
            )
            .mount(&server)
            .await;

        let client = SyncthingClient::new(&server.uri(), "secret");
        let listing = client.browse("music").await.unwrap();

        assert_eq!(listing.len(), 1);
        assert!(listing.contains_key("album"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/system/config"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = SyncthingClient::new(&server.uri(), "");
        let err = client.folder_config("music").await.unwrap_err();

        assert_matches!(err, StfindError::Decode { ref body, .. } if body == "not json at all");
        assert!(err.to_string().contains("not json at all"));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/system/config"))
            .respond_with(ResponseTemplate::new(403).set_body_string("CSRF Error"))
            .mount(&server)
            .await;

        let client = SyncthingClient::new(&server.uri(), "wrong");
        let err = client.folder_config("music").await.unwrap_err();

        assert_matches!(err, StfindError::Status { status: 403, ref body, .. } if body == "CSRF Error");
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Nothing listens on the discard port
        let client = SyncthingClient::new("http://127.0.0.1:9", "");
        assert_matches!(
            client.browse("music").await,
            Err(StfindError::Transport { .. })
        );
    }
}
