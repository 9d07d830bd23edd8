use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// A remote identifier column value.
///
/// `Unset` means the id was never queried, `Unavailable` means the query ran
/// and found nothing. Both persist as their literal sentinel strings so the
/// two states survive round trips and are never collapsed into an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteId {
    Unset,
    Unavailable,
    Id(String),
}

pub const SENTINEL_UNSET: &str = "unset";
pub const SENTINEL_UNAVAILABLE: &str = "unavailable";

impl RemoteId {
    pub fn from_string(s: String) -> Self {
        match s.as_str() {
            SENTINEL_UNSET => RemoteId::Unset,
            SENTINEL_UNAVAILABLE => RemoteId::Unavailable,
            _ => RemoteId::Id(s),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, RemoteId::Id(_))
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            RemoteId::Id(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteId::Unset => f.write_str(SENTINEL_UNSET),
            RemoteId::Unavailable => f.write_str(SENTINEL_UNAVAILABLE),
            RemoteId::Id(id) => f.write_str(id),
        }
    }
}

impl Serialize for RemoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RemoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(RemoteId::from_string(s))
    }
}

/// Tags read from one local audio file plus the identity hash derived from
/// them. The hash covers title, artist and album only, so re-tagging other
/// frames elsewhere does not change the track's identity.
#[derive(Debug, Clone)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub content_id: String,
}

/// One row of a playlist's track table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub content_id: String,
    pub remote_track_id: RemoteId,
    pub included: bool,
}

impl TrackRecord {
    pub fn from_tags(tags: TrackTags) -> Self {
        Self {
            title: tags.title,
            artist: tags.artist,
            album: tags.album,
            album_artist: tags.album_artist,
            content_id: tags.content_id,
            remote_track_id: RemoteId::Unset,
            included: true,
        }
    }
}

/// One row of the global playlist registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRecord {
    pub local_name: String,
    pub remote_name: String,
    pub remote_id: RemoteId,
    #[serde(rename = "artworkPicturePath")]
    pub artwork_path: String,
}

impl PlaylistRecord {
    /// Builds the default record for a playlist file. The editable fields
    /// (`remote_name`, `remote_id`, `artwork_path`) are only defaulted here;
    /// once the registry holds a row for `local_name` the on-disk values win.
    pub fn new(local_name: &str) -> Self {
        Self {
            local_name: local_name.to_string(),
            remote_name: local_name.to_string(),
            remote_id: RemoteId::Unset,
            artwork_path: format!("artwork/{}.jpg", local_name),
        }
    }

    /// Display label used in log lines, e.g. `Focus Mix - 37i9dQZF1DX`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.remote_name, self.remote_id)
    }
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub remote_name: String,
    pub remote_id: String,
    pub artwork: String,
}

// --- Spotify Web API wire types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracks {
    pub items: Vec<SearchTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemsResponse {
    pub items: Vec<PlaylistItem>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<PlaylistItemTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemTrack {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemsRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveItemsRequest {
    pub tracks: Vec<RemoveItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveItem {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderItemsRequest {
    pub range_start: u64,
    pub insert_before: u64,
}

// --- MusicBrainz wire types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSearchResponse {
    #[serde(default)]
    pub artists: Vec<ArtistSearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSearchHit {
    pub name: String,
    #[serde(rename = "sort-name")]
    pub sort_name: String,
}
