use tabled::Table;

use crate::{
    error, info,
    management::PlaylistRegistryManager,
    types::PlaylistTableRow,
};

/// Prints the playlist registry as a table. The remote name, remote id and
/// artwork path columns are the ones the user may edit in the registry file
/// to wire a local playlist to an existing Spotify playlist.
pub async fn list_playlists() {
    let registry = PlaylistRegistryManager::new();
    let records = match registry.load().await {
        Ok(records) => records,
        Err(e) => error!("Cannot load playlist registry: {}", e),
    };

    if records.is_empty() {
        info!("No playlists registered yet. Run spotim3u sync <folder> first.");
        return;
    }

    let table_rows: Vec<PlaylistTableRow> = records
        .into_iter()
        .map(|r| PlaylistTableRow {
            name: r.local_name.clone(),
            remote_name: r.remote_name.clone(),
            remote_id: r.remote_id.to_string(),
            artwork: r.artwork_path,
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}
