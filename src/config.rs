use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use directories_next::ProjectDirs;
use serde::Deserialize;

/// Looked up in the working directory when no path is given.
const DEFAULT_CONFIG_FILE: &str = "snipbin.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub storage: Storage,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://127.0.0.1:8080".to_owned(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            storage: Storage::default(),
            limits: Limits::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or from `snipbin.toml` if it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Config::default()),
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Public URL of a paste.
    pub fn paste_url(&self, id: &str) -> String {
        format!("{}/v/{id}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub kind: StorageKind,
    pub file: FileStorage,
    #[cfg(feature = "s3")]
    pub s3: Option<S3Storage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileStorage {
    pub dir: PathBuf,
}

impl Default for FileStorage {
    fn default() -> Self {
        let dir = ProjectDirs::from("", "", "snipbin")
            .map(|dirs| dirs.data_dir().join("pastes"))
            .unwrap_or_else(|| PathBuf::from("pastes"));
        FileStorage { dir }
    }
}

/// Any S3-compatible bucket. For Google Cloud Storage point `endpoint` at
/// `https://storage.googleapis.com` and use HMAC keys.
#[derive(Debug, Clone, Deserialize)]
#[cfg(feature = "s3")]
pub struct S3Storage {
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Memory,
    #[cfg(feature = "s3")]
    S3,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_upload_size: usize,
    pub storage_timeout_secs: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_upload_size: 1024 * 1024,
            storage_timeout_secs: 10,
        }
    }
}

impl Limits {
    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs)
    }
}
