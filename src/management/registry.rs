use std::{collections::HashMap, path::PathBuf};

use crate::types::PlaylistRecord;

use super::{StoreError, default_db_root};

/// Persists the global playlist registry: one row per local playlist file,
/// keyed by local name. Rows are created with defaults on first sight of a
/// playlist file; the remote name, remote id and artwork path may be edited
/// in the persisted file and are merged back on every run, never re-derived.
pub struct PlaylistRegistryManager {
    root: PathBuf,
}

impl PlaylistRegistryManager {
    pub fn new() -> Self {
        Self {
            root: default_db_root(),
        }
    }

    /// Registry rooted at an explicit directory instead of the default data
    /// dir. Used by tests.
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    pub async fn load(&self) -> Result<Vec<PlaylistRecord>, StoreError> {
        let path = self.registry_path();
        if !path.is_file() {
            return Ok(Vec::new());
        }

        let content = async_fs::read_to_string(&path).await?;
        let records: Vec<PlaylistRecord> = serde_json::from_str(&content)?;
        Ok(records)
    }

    /// Merges the freshly discovered records with the on-disk registry and
    /// persists the result. Returns the merged registry.
    pub async fn register(
        &self,
        discovered: Vec<PlaylistRecord>,
    ) -> Result<Vec<PlaylistRecord>, StoreError> {
        let on_disk = self.load().await?;
        let merged = merge_registry(discovered, on_disk);
        self.persist(&merged).await?;
        Ok(merged)
    }

    pub async fn persist(&self, records: &[PlaylistRecord]) -> Result<(), StoreError> {
        let path = self.registry_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(records)?;
        async_fs::write(&path, json).await?;
        Ok(())
    }

    fn registry_path(&self) -> PathBuf {
        self.root.join("playlist.json")
    }
}

impl Default for PlaylistRegistryManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Merges a freshly discovered registry with the on-disk one. On-disk rows
/// win for playlists present in both, so out-of-band edits to the remote
/// name, remote id or artwork path survive; playlists seen for the first
/// time keep their defaults. The result is sorted by local name.
pub fn merge_registry(
    discovered: Vec<PlaylistRecord>,
    on_disk: Vec<PlaylistRecord>,
) -> Vec<PlaylistRecord> {
    let mut by_name: HashMap<String, PlaylistRecord> = discovered
        .into_iter()
        .map(|r| (r.local_name.clone(), r))
        .collect();

    for record in on_disk {
        by_name.insert(record.local_name.clone(), record);
    }

    let mut merged: Vec<PlaylistRecord> = by_name.into_values().collect();
    merged.sort_by(|a, b| a.local_name.cmp(&b.local_name));
    merged
}
