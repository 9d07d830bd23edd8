//! Artist name transliteration via the MusicBrainz Web Service.
//!
//! MusicBrainz stores a latin-script `sort-name` for most artists, which is
//! the best free source for romanized names when local tags carry e.g.
//! Japanese or Korean script that Spotify's search does not match. Only the
//! artist search endpoint is consumed, anonymously, which is why the advisory
//! request interval from the configuration is honored before every call.

use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

use crate::{config, types::ArtistSearchResponse};

/// Looks up the romanized form of an artist name.
///
/// Queries the MusicBrainz artist search with the configured User-Agent and
/// returns the top hit's `sort-name` with separator commas stripped
/// ("Sakamoto, Ryuichi" becomes "Sakamoto Ryuichi"). Returns `None` when the
/// search has no hits or the request fails; transliteration is best-effort
/// and never aborts a resolution.
pub async fn romanised_name(artist: &str) -> Option<String> {
    sleep(Duration::from_millis(config::musicbrainz_interval_ms())).await;

    let api_url = format!(
        "{uri}/artist/",
        uri = &config::musicbrainz_apiurl()
    );

    let client = Client::new();
    let response = client
        .get(&api_url)
        .query(&[
            ("query", format!("artist:{}", artist)),
            ("limit", "5".to_string()),
            ("fmt", "json".to_string()),
        ])
        .header("User-Agent", config::musicbrainz_useragent())
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?;

    let result = response.json::<ArtistSearchResponse>().await.ok()?;

    result
        .artists
        .first()
        .map(|hit| hit.sort_name.replace(',', ""))
}
