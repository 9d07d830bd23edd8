use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    Res, config, error,
    management::TokenManager,
    musicbrainz,
    types::{RemoteId, SearchResponse},
    utils, warning,
};

/// The query surface the resolver runs against.
///
/// Implemented by the Spotify-backed client and, in tests, by an in-memory
/// fake, mirroring how the reconciler abstracts its playlist surface.
pub trait TrackSearch {
    /// Issues one structured track search and returns the first result's id.
    async fn search(&mut self, query: &str) -> Res<Option<String>>;
}

/// Spotify-backed [`TrackSearch`] implementation.
pub struct SpotifySearch;

impl TrackSearch for SpotifySearch {
    async fn search(&mut self, query: &str) -> Res<Option<String>> {
        Ok(search_track(query).await?)
    }
}

/// Resolves the Spotify track id for one local track.
///
/// Sentinel-aware caching: an `unset` id is always queried; an `unavailable`
/// id is re-queried only when `force_update` is set; a real id is returned
/// unchanged without any network traffic. This is the dominant network cost
/// of a run, one round trip per unresolved track.
///
/// The primary query quotes the title (with any "(feat. ...)" credit
/// stripped) and constrains album and artist. When it misses, a fallback
/// query drops the album constraint and swaps the artist for its MusicBrainz
/// romanized form, which rescues tracks whose local tags are in non-Latin
/// script. A miss on both, or any transport failure, yields `unavailable`
/// rather than an error.
pub async fn resolve_track_id<S: TrackSearch>(
    searcher: &mut S,
    title: Option<&str>,
    artist: Option<&str>,
    album: Option<&str>,
    current: &RemoteId,
    force_update: bool,
) -> RemoteId {
    match current {
        RemoteId::Unset => {}
        RemoteId::Unavailable if force_update => {}
        other => return other.clone(),
    }

    let title = utils::strip_featuring(title.unwrap_or_default());
    let artist = artist.unwrap_or_default();
    let album = album.unwrap_or_default();

    let query = format!("track:\"{}\" album:{} artist:{}", title, album, artist);
    match searcher.search(&query).await {
        Ok(Some(id)) => return RemoteId::Id(id),
        Ok(None) => {}
        Err(e) => {
            warning!("Track search failed for '{}': {}", query, e);
            return RemoteId::Unavailable;
        }
    }

    let fallback_artist = musicbrainz::romanised_name(artist)
        .await
        .unwrap_or_else(|| artist.to_string());
    let query = format!("track:\"{}\" artist:{}", title, fallback_artist);
    match searcher.search(&query).await {
        Ok(Some(id)) => RemoteId::Id(id),
        Ok(None) => {
            warning!("No Spotify match for '{}'", query);
            RemoteId::Unavailable
        }
        Err(e) => {
            warning!("Track search failed for '{}': {}", query, e);
            RemoteId::Unavailable
        }
    }
}

/// Issues one structured track search and returns the first result's id.
///
/// Handles rate limiting by honoring the `Retry-After` header on 429
/// responses (delays above 120 seconds are not waited out) and retries 502
/// Bad Gateway responses after a fixed delay.
pub async fn search_track(query: &str) -> Result<Option<String>, reqwest::Error> {
    let api_url = format!("{uri}/search", uri = &config::spotify_apiurl());

    let mut token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load token. Please run spotim3u auth\n Error: {}",
                e
            );
        }
    };

    loop {
        let client = Client::new();
        let token = token_mgr.get_valid_token().await;
        let response = client
            .get(&api_url)
            .query(&[("q", query), ("type", "track"), ("limit", "1")])
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            if let Some(retry_after) = response.headers().get("retry-after") {
                let retry_after = retry_after
                    .to_str()
                    .unwrap_or("0")
                    .parse::<u64>()
                    .unwrap_or(0);
                if retry_after <= 120 {
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                warning!(
                    "Retry after has reached an abnormal high of {} seconds. Try again later.",
                    retry_after
                );
            }
        }

        let response = match response.error_for_status() {
            Ok(valid_response) => valid_response,
            Err(err) => {
                if let Some(status) = err.status() {
                    if status == StatusCode::BAD_GATEWAY {
                        sleep(Duration::from_secs(10)).await;
                        continue; // retry
                    }
                }
                return Err(err); // propagate other errors
            }
        };

        let json = response.json::<SearchResponse>().await?;
        return Ok(json.tracks.items.first().map(|t| t.id.clone()));
    }
}
