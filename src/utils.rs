use std::{collections::HashSet, path::Path, sync::LazyLock};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::types::TrackRecord;

/// Cover uploads above this size are rejected by Spotify, so anything larger
/// is skipped locally with a warning instead of being sent.
pub const ARTWORK_MAX_BYTES: u64 = 190 * 1024;

static FEAT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(feat\.? .+\)").expect("feat regex must compile"));

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Strips a parenthesized "feat." credit from a track title, e.g.
/// `Song (feat. Other Artist)` becomes `Song`. Search results are better
/// without the credit since Spotify titles rarely carry it verbatim.
pub fn strip_featuring(title: &str) -> String {
    FEAT_SUFFIX.replace_all(title, "").trim().to_string()
}

/// Find/replace rule applied to every path read from a playlist file, used
/// when the playlist was written on a machine with different mount points.
pub struct PathRewrite {
    from: String,
    to: String,
    pattern: Option<Regex>,
}

impl PathRewrite {
    /// Builds a rewrite rule. With `use_regex` the `from` string is compiled
    /// as a regular expression; otherwise it is matched literally. An empty
    /// `from` disables rewriting.
    pub fn new(from: &str, to: &str, use_regex: bool) -> Result<Self, String> {
        let pattern = if use_regex && !from.is_empty() {
            Some(Regex::new(from).map_err(|e| format!("Invalid --replace-from regex: {}", e))?)
        } else {
            None
        };

        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            pattern,
        })
    }

    pub fn apply(&self, line: &str) -> String {
        if self.from.is_empty() {
            return line.to_string();
        }

        match &self.pattern {
            Some(re) => re.replace_all(line, self.to.as_str()).to_string(),
            None => line.replace(&self.from, &self.to),
        }
    }
}

/// Derives the stable content identifier for a track from its identity tags.
/// Absent tags hash as empty strings so the id stays stable for files that
/// never carried the tag in the first place.
pub fn content_id(title: Option<&str>, artist: Option<&str>, album: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.unwrap_or_default().as_bytes());
    hasher.update(artist.unwrap_or_default().as_bytes());
    hasher.update(album.unwrap_or_default().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Extracts the ordered target sequence from a track table: included rows
/// with a resolved remote id, in file order.
pub fn target_sequence(records: &[TrackRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.included)
        .filter_map(|r| r.remote_track_id.id().map(str::to_string))
        .collect()
}

pub fn has_duplicate_ids(ids: &[String]) -> bool {
    let mut seen = HashSet::new();
    ids.iter().any(|id| !seen.insert(id.as_str()))
}

pub fn dedup_preserving_order(ids: &mut Vec<String>) {
    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}

/// Derives the registry key for a playlist file from its file name, without
/// the extension.
pub fn playlist_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads a playlist cover image and returns it base64-encoded, or `None`
/// when the file is missing or exceeds [`ARTWORK_MAX_BYTES`]. The caller
/// decides whether a missing cover is worth a warning.
pub async fn read_artwork_base64(path: &str) -> Option<String> {
    let meta = async_fs::metadata(path).await.ok()?;
    if !meta.is_file() || meta.len() > ARTWORK_MAX_BYTES {
        return None;
    }

    let bytes = async_fs::read(path).await.ok()?;
    Some(STANDARD.encode(bytes))
}
