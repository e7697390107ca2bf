//! Per-server settings persisted to a flat JSON file
//!
//! The store is the bot's only durable state. It loads once at startup (an
//! absent file is an empty store) and rewrites the whole file on every
//! `set`. The write lock is held across the file write, so in-process
//! mutations are serialized; a second process on the same file is not safe.

use async_trait::async_trait;
use gaffer_core::{GafferError, Result, ServerConfig};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Per-server settings behind an injectable interface
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Configuration for one server, if set up
    async fn get(&self, server_id: &str) -> Option<ServerConfig>;

    /// Overwrite one server's configuration and persist
    async fn set(&self, server_id: &str, config: ServerConfig) -> Result<()>;

    /// Every configured server, for scheduled-job iteration
    async fn all(&self) -> Vec<(String, ServerConfig)>;
}

/// JSON-file-backed settings store
///
/// File shape: one top-level object, server id strings mapping to
/// `{"league_id": N, "channel_id": N}`.
pub struct JsonSettingsStore {
    path: PathBuf,
    servers: RwLock<HashMap<String, ServerConfig>>,
}

impl JsonSettingsStore {
    /// Open the store, loading the file if it exists
    ///
    /// Entries with a zero channel id are rejected as corruption.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let servers = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let map: HashMap<String, ServerConfig> = serde_json::from_str(&contents)?;
                // Setup can never store a zero channel id; a hand-edited
                // file that carries one would panic at `ChannelId::new`.
                if let Some((id, _)) = map.iter().find(|(_, c)| c.channel_id == 0) {
                    return Err(GafferError::InvalidConfig(format!(
                        "settings entry for server {} has channel_id 0",
                        id
                    )));
                }
                info!(path = ?path, servers = map.len(), "Loaded settings store");
                map
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = ?path, "No settings file yet, starting empty");
                HashMap::new()
            }
            Err(e) => return Err(GafferError::Io(e)),
        };

        Ok(Self {
            path,
            servers: RwLock::new(servers),
        })
    }

    /// Rewrite the whole file from the given map
    async fn persist(&self, servers: &HashMap<String, ServerConfig>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let contents = serde_json::to_string_pretty(servers)?;
        tokio::fs::write(&self.path, contents).await?;
        debug!(path = ?self.path, servers = servers.len(), "Persisted settings store");
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn get(&self, server_id: &str) -> Option<ServerConfig> {
        self.servers.read().await.get(server_id).copied()
    }

    async fn set(&self, server_id: &str, config: ServerConfig) -> Result<()> {
        // The lock spans the file write so concurrent sets cannot
        // interleave a stale rewrite.
        let mut servers = self.servers.write().await;
        servers.insert(server_id.to_string(), config);
        self.persist(&servers).await
    }

    async fn all(&self) -> Vec<(String, ServerConfig)> {
        self.servers
            .read()
            .await
            .iter()
            .map(|(id, config)| (id.clone(), *config))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(league_id: u64, channel_id: u64) -> ServerConfig {
        ServerConfig {
            league_id,
            channel_id,
        }
    }

    #[tokio::test]
    async fn test_absent_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = JsonSettingsStore::open(dir.path().join("servers.json"))
            .await
            .unwrap();

        assert!(store.get("123").await.is_none());
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let dir = tempdir().unwrap();
        let store = JsonSettingsStore::open(dir.path().join("servers.json"))
            .await
            .unwrap();

        store.set("123", config(314, 777)).await.unwrap();
        assert_eq!(store.get("123").await, Some(config(314, 777)));

        // Set overwrites unconditionally
        store.set("123", config(99, 778)).await.unwrap();
        assert_eq!(store.get("123").await, Some(config(99, 778)));

        assert_eq!(store.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_persistence_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servers.json");

        // First session: write data
        {
            let store = JsonSettingsStore::open(&path).await.unwrap();
            store.set("9001", config(314, 777)).await.unwrap();
        }

        // Second session: read data
        {
            let store = JsonSettingsStore::open(&path).await.unwrap();
            assert_eq!(store.get("9001").await, Some(config(314, 777)));
        }
    }

    #[tokio::test]
    async fn test_open_rejects_zero_channel_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servers.json");
        tokio::fs::write(&path, r#"{"123":{"league_id":314,"channel_id":0}}"#)
            .await
            .unwrap();

        let result = JsonSettingsStore::open(&path).await;
        assert!(matches!(result, Err(GafferError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_file_shape_is_flat_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servers.json");
        let store = JsonSettingsStore::open(&path).await.unwrap();

        store.set("123", config(314, 777)).await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["123"]["league_id"], 314);
        assert_eq!(value["123"]["channel_id"], 777);
    }
}
