use chrono::Utc;
use spotim3u::management::{
    PlaylistRegistryManager, TokenManager, TrackTableManager, merge_registry, merge_track_table,
};
use spotim3u::types::{PlaylistRecord, RemoteId, Token, TrackRecord, TrackTags};
use spotim3u::utils::content_id;

// Helper function to create a playlist record with a resolved remote id
fn linked_playlist(local_name: &str, remote_name: &str, remote_id: &str) -> PlaylistRecord {
    PlaylistRecord {
        local_name: local_name.to_string(),
        remote_name: remote_name.to_string(),
        remote_id: RemoteId::Id(remote_id.to_string()),
        artwork_path: format!("artwork/{}.jpg", local_name),
    }
}

// Helper function to create tags for a title/artist/album triple
fn tags(title: &str, artist: &str, album: &str) -> TrackTags {
    TrackTags {
        title: Some(title.to_string()),
        artist: Some(artist.to_string()),
        album: Some(album.to_string()),
        album_artist: None,
        content_id: content_id(Some(title), Some(artist), Some(album)),
    }
}

fn record(title: &str, artist: &str, album: &str, remote_id: RemoteId, included: bool) -> TrackRecord {
    let mut record = TrackRecord::from_tags(tags(title, artist, album));
    record.remote_track_id = remote_id;
    record.included = included;
    record
}

#[tokio::test]
async fn test_registry_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let registry = PlaylistRegistryManager::at(dir.path().to_path_buf());

    let records = vec![
        linked_playlist("focus", "Focus Mix", "37i9dQZF1DX"),
        PlaylistRecord::new("gym"),
    ];
    registry.persist(&records).await.unwrap();

    let loaded = registry.load().await.unwrap();
    assert_eq!(loaded, records);
}

#[tokio::test]
async fn test_registry_persists_sentinels_and_artwork_key() {
    let dir = tempfile::tempdir().unwrap();
    let registry = PlaylistRegistryManager::at(dir.path().to_path_buf());

    registry
        .persist(&[PlaylistRecord::new("gym")])
        .await
        .unwrap();

    // The sentinel must land in the file as a literal string and the artwork
    // column must keep its historical key, both are hand-edited by users
    let raw = std::fs::read_to_string(dir.path().join("playlist.json")).unwrap();
    assert!(raw.contains("\"unset\""));
    assert!(raw.contains("artworkPicturePath"));
}

#[tokio::test]
async fn test_registry_load_without_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let registry = PlaylistRegistryManager::at(dir.path().to_path_buf());

    let loaded = registry.load().await.unwrap();
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn test_register_keeps_edited_rows_and_adds_new_ones() {
    let dir = tempfile::tempdir().unwrap();
    let registry = PlaylistRegistryManager::at(dir.path().to_path_buf());

    // Simulate a user who linked "focus" to a Spotify playlist by hand
    let edited = linked_playlist("focus", "Deep Focus", "37i9dQZF1DX");
    registry.persist(&[edited.clone()]).await.unwrap();

    let discovered = vec![PlaylistRecord::new("focus"), PlaylistRecord::new("gym")];
    let merged = registry.register(discovered).await.unwrap();

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0], edited);
    assert_eq!(merged[1], PlaylistRecord::new("gym"));

    // The merge result must have been written back
    let reloaded = registry.load().await.unwrap();
    assert_eq!(reloaded, merged);
}

#[test]
fn test_merge_registry_on_disk_wins_and_sorts() {
    let discovered = vec![
        PlaylistRecord::new("zzz"),
        PlaylistRecord::new("focus"),
        PlaylistRecord::new("gym"),
    ];
    let on_disk = vec![linked_playlist("gym", "Gym Bangers", "4xQZF1DX")];

    let merged = merge_registry(discovered, on_disk);

    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].local_name, "focus");
    assert_eq!(merged[1].remote_name, "Gym Bangers");
    assert_eq!(merged[1].remote_id, RemoteId::Id("4xQZF1DX".to_string()));
    assert_eq!(merged[2].local_name, "zzz");
}

#[tokio::test]
async fn test_track_table_round_trip_keeps_all_sentinel_states() {
    let dir = tempfile::tempdir().unwrap();
    let table = TrackTableManager::at(dir.path().to_path_buf(), "Focus Mix - 37i9dQZF1DX");

    let records = vec![
        record("Alpha", "Artist A", "Album A", RemoteId::Id("id1".to_string()), true),
        record("Beta", "Artist B", "Album B", RemoteId::Unavailable, true),
        record("Gamma", "Artist C", "Album C", RemoteId::Unset, false),
    ];
    table.persist(&records).await.unwrap();

    let loaded = table.load().await.unwrap();
    assert_eq!(loaded, records);

    let raw = std::fs::read_to_string(dir.path().join("Focus Mix - 37i9dQZF1DX.json")).unwrap();
    assert!(raw.contains("\"unavailable\""));
    assert!(raw.contains("\"unset\""));
}

#[test]
fn test_merge_track_table_carries_resolution_state_over() {
    let on_disk = vec![
        record("Alpha", "Artist A", "Album A", RemoteId::Id("id1".to_string()), true),
        record("Beta", "Artist B", "Album B", RemoteId::Unavailable, false),
        record("Gone", "Artist G", "Album G", RemoteId::Id("id9".to_string()), true),
    ];

    // Fresh scan: "Gone" left the playlist, "New" joined, order changed
    let fresh = vec![
        tags("Beta", "Artist B", "Album B"),
        tags("New", "Artist N", "Album N"),
        tags("Alpha", "Artist A", "Album A"),
    ];

    let merged = merge_track_table(fresh, &on_disk);

    assert_eq!(merged.len(), 3);

    // Order follows the fresh scan, not the on-disk table
    assert_eq!(merged[0].title.as_deref(), Some("Beta"));
    assert_eq!(merged[1].title.as_deref(), Some("New"));
    assert_eq!(merged[2].title.as_deref(), Some("Alpha"));

    // Resolution state and inclusion flag carried over by content id
    assert_eq!(merged[0].remote_track_id, RemoteId::Unavailable);
    assert!(!merged[0].included);
    assert_eq!(merged[1].remote_track_id, RemoteId::Unset);
    assert!(merged[1].included);
    assert_eq!(merged[2].remote_track_id, RemoteId::Id("id1".to_string()));
    assert!(merged[2].included);
}

#[test]
fn test_merge_track_table_empty_scan_drops_everything() {
    let on_disk = vec![record(
        "Alpha",
        "Artist A",
        "Album A",
        RemoteId::Id("id1".to_string()),
        true,
    )];

    let merged = merge_track_table(Vec::new(), &on_disk);
    assert!(merged.is_empty());
}

fn token_obtained_at(obtained_at: u64, expires_in: u64) -> Token {
    Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        scope: "playlist-modify-public".to_string(),
        expires_in,
        obtained_at,
    }
}

#[test]
fn test_fresh_token_is_not_expired() {
    let now = Utc::now().timestamp() as u64;
    let manager = TokenManager::new(token_obtained_at(now, 3600));
    assert!(!manager.is_expired());
}

#[test]
fn test_stale_token_is_expired() {
    let now = Utc::now().timestamp() as u64;
    let manager = TokenManager::new(token_obtained_at(now - 7200, 3600));
    assert!(manager.is_expired());
}

#[test]
fn test_token_within_refresh_window_is_expired() {
    let now = Utc::now().timestamp() as u64;
    let manager = TokenManager::new(token_obtained_at(now - 3500, 3600));
    assert!(manager.is_expired());
}

#[test]
fn test_token_with_tiny_lifetime_is_expired() {
    // A lifetime below the 240 s refresh window must read as expired,
    // not panic on arithmetic
    let now = Utc::now().timestamp() as u64;
    let manager = TokenManager::new(token_obtained_at(now, 60));
    assert!(manager.is_expired());
}

#[tokio::test]
async fn test_track_table_load_without_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let table = TrackTableManager::at(dir.path().to_path_buf(), "nothing here");

    let loaded = table.load().await.unwrap();
    assert!(loaded.is_empty());
}
