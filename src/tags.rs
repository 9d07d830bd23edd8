//! Audio tag extraction.
//!
//! Maps an audio file to the four identity tags (title, artist, album, album
//! artist) and a stable content id derived from them. Tag decoding itself is
//! delegated to `lofty`, which normalizes the format-specific frame names
//! (`TIT2`, `©nam`, `TITLE`, ...) onto shared item keys; this module only
//! decides the lookup order per logical field and treats a field with no
//! present key as absent rather than an error.
//!
//! Unreadable or corrupt files surface as an error; the caller decides
//! whether to skip the file or abort the run.

use std::path::Path;

use lofty::prelude::{ItemKey, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Tag;

use crate::{Res, types::TrackTags, utils};

/// Reads the embedded metadata of `path` and derives the content id.
///
/// Pure read; the file is never modified. Fields whose tag keys are all
/// absent come back as `None` and hash as empty strings, so a file with no
/// tags at all still gets a stable (if degenerate) identity.
pub fn extract(path: &Path) -> Res<TrackTags> {
    let tagged_file = Probe::open(path)?.read()?;
    let tags: Vec<&Tag> = tagged_file.tags().iter().collect();

    let title = first_present(&tags, &[ItemKey::TrackTitle]);
    let artist = first_present(&tags, &[ItemKey::TrackArtist]);
    let album = first_present(&tags, &[ItemKey::AlbumTitle]);
    let album_artist = first_present(&tags, &[ItemKey::AlbumArtist]);

    let content_id = utils::content_id(title.as_deref(), artist.as_deref(), album.as_deref());

    Ok(TrackTags {
        title,
        artist,
        album,
        album_artist,
        content_id,
    })
}

/// Returns the first present, non-empty value for any of `keys`, checking
/// every tag block the file carries (an MP3 may hold both ID3v2 and APE).
fn first_present(tags: &[&Tag], keys: &[ItemKey]) -> Option<String> {
    for key in keys {
        for tag in tags {
            if let Some(value) = tag.get_string(key) {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}
