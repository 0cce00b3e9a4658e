//! Common test utilities and helpers for stfind tests

use assert_fs::prelude::*;
use assert_fs::TempDir;
use serde_json::{json, Value};
use std::process::{Command, Output};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FOLDER_ID: &str = "abcd-1234";
pub const API_KEY: &str = "test-api-key";

/// A Syncthing folder on disk, an isolated home directory and a mock Syncthing API
pub struct TestEnvironment {
    pub folder: TempDir,
    pub home: TempDir,
    pub server: MockServer,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let folder = TempDir::new().expect("Failed to create folder dir");
        folder
            .child(".stfolder")
            .create_dir_all()
            .expect("Failed to create folder marker");

        Self {
            folder,
            home: TempDir::new().expect("Failed to create home dir"),
            server: MockServer::start().await,
        }
    }

    /// Folder path as Syncthing would report it, with a trailing separator
    pub fn folder_path(&self) -> String {
        format!("{}/", self.folder.path().display())
    }

    /// Serve a config that maps FOLDER_ID to the temp folder
    pub async fn mount_config(&self, versioning: Value) {
        let config = json!({
            "version": 37,
            "folders": [
                {"id": "other", "path": "/nowhere", "markerName": ".stfolder"},
                {
                    "id": FOLDER_ID,
                    "path": self.folder_path(),
                    "markerName": ".stfolder",
                    "versioning": versioning
                }
            ]
        });

        Mock::given(method("GET"))
            .and(path("/rest/system/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(config))
            .mount(&self.server)
            .await;
    }

    /// Serve a browse listing for FOLDER_ID
    pub async fn mount_browse(&self, listing: Value) {
        Mock::given(method("GET"))
            .and(path("/rest/db/browse"))
            .and(query_param("folder", FOLDER_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing))
            .mount(&self.server)
            .await;
    }

    /// Config with default versioning plus the given listing
    pub async fn mount_folder(&self, listing: Value) {
        self.mount_config(json!({"type": "", "params": {}})).await;
        self.mount_browse(listing).await;
    }

    /// Like `mount_folder`, but the API only answers requests carrying `api_key`
    pub async fn mount_folder_requiring_key(&self, api_key: &str, listing: Value) {
        let config = json!({
            "folders": [{"id": FOLDER_ID, "path": self.folder_path(), "markerName": ".stfolder"}]
        });

        Mock::given(method("GET"))
            .and(path("/rest/system/config"))
            .and(header("X-API-Key", api_key))
            .respond_with(ResponseTemplate::new(200).set_body_json(config))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/db/browse"))
            .and(header("X-API-Key", api_key))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing))
            .mount(&self.server)
            .await;
    }

    /// stfind pointed at the mock server, with no user config in reach
    pub fn stfind(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_stfind"));
        cmd.env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path())
            .env_remove("RUST_LOG")
            .args(["--url", &self.server.uri(), "--folderid", FOLDER_ID]);
        cmd
    }

    pub fn stfind_with_key(&self) -> Command {
        let mut cmd = self.stfind();
        cmd.args(["--apikey", API_KEY]);
        cmd
    }

    /// Convert a relative path into the absolute key stfind prints
    pub fn abs(&self, relative: &str) -> String {
        format!("{}/{}", self.folder.path().display(), relative)
    }
}

/// Run a command and return its output, panicking only if it cannot start
pub fn run(mut cmd: Command) -> Output {
    cmd.output().expect("Failed to execute stfind")
}

pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}
