use std::{collections::HashMap, path::PathBuf};

use crate::types::{TrackRecord, TrackTags};

use super::{StoreError, default_db_root};

/// Persists one playlist's track table, keyed on disk by the playlist's
/// registry label so a renamed remote playlist gets a fresh table. The table
/// is an ordered list: row order is the local file's line order, which is
/// what the reconciler ultimately mirrors onto Spotify.
pub struct TrackTableManager {
    root: PathBuf,
    table_key: String,
}

impl TrackTableManager {
    pub fn new(table_key: &str) -> Self {
        Self {
            root: default_db_root(),
            table_key: table_key.to_string(),
        }
    }

    /// Table rooted at an explicit directory instead of the default data
    /// dir. Used by tests.
    pub fn at(root: PathBuf, table_key: &str) -> Self {
        Self {
            root,
            table_key: table_key.to_string(),
        }
    }

    pub async fn load(&self) -> Result<Vec<TrackRecord>, StoreError> {
        let path = self.table_path();
        if !path.is_file() {
            return Ok(Vec::new());
        }

        let content = async_fs::read_to_string(&path).await?;
        let records: Vec<TrackRecord> = serde_json::from_str(&content)?;
        Ok(records)
    }

    pub async fn persist(&self, records: &[TrackRecord]) -> Result<(), StoreError> {
        let path = self.table_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(records)?;
        async_fs::write(&path, json).await?;
        Ok(())
    }

    fn table_path(&self) -> PathBuf {
        self.root.join(format!("{}.json", self.table_key))
    }
}

/// Builds the merged track table for one scan of a playlist file.
///
/// The fresh scan is authoritative for membership and order: rows on disk
/// whose content id did not show up again are dropped. For surviving rows
/// the resolved remote id and the inclusion flag are carried over from disk,
/// so toggling a track out of a playlist does not throw away the id it was
/// once resolved to. Newly seen tracks start `unset` and included.
pub fn merge_track_table(fresh: Vec<TrackTags>, on_disk: &[TrackRecord]) -> Vec<TrackRecord> {
    let by_content_id: HashMap<&str, &TrackRecord> = on_disk
        .iter()
        .map(|r| (r.content_id.as_str(), r))
        .collect();

    fresh
        .into_iter()
        .map(|tags| {
            let mut record = TrackRecord::from_tags(tags);
            if let Some(existing) = by_content_id.get(record.content_id.as_str()) {
                record.remote_track_id = existing.remote_track_id.clone();
                record.included = existing.included;
            }
            record
        })
        .collect()
}
