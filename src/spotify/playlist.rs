use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    Res, config,
    management::TokenManager,
    reconcile::{PAGE_LIMIT, RemotePlaylist},
    types::{
        AddItemsRequest, PlaylistItemsResponse, RemoveItem, RemoveItemsRequest,
        ReorderItemsRequest,
    },
};

/// Spotify-backed implementation of the reconciler's playlist surface.
///
/// Holds the token manager so expired tokens refresh transparently across
/// the many sequential calls a reconciliation run issues.
pub struct SpotifyPlaylist {
    token_mgr: TokenManager,
}

impl SpotifyPlaylist {
    /// Connects using the persisted token. Fails when no token has been
    /// stored yet; the caller should direct the user to `spotim3u auth`.
    pub async fn connect() -> Result<Self, String> {
        let token_mgr = TokenManager::load().await?;
        Ok(Self { token_mgr })
    }

    /// Uploads a base64-encoded JPEG as the playlist's cover image.
    pub async fn upload_cover(&mut self, playlist_id: &str, image_base64: &str) -> Res<()> {
        let api_url = format!(
            "{uri}/playlists/{id}/images",
            uri = &config::spotify_apiurl(),
            id = playlist_id
        );

        let token = self.token_mgr.get_valid_token().await;
        Client::new()
            .put(&api_url)
            .bearer_auth(token)
            .header("Content-Type", "image/jpeg")
            .body(image_base64.to_string())
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    fn tracks_url(&self, playlist_id: &str) -> String {
        format!(
            "{uri}/playlists/{id}/tracks",
            uri = &config::spotify_apiurl(),
            id = playlist_id
        )
    }
}

fn track_uri(id: &str) -> String {
    format!("spotify:track:{}", id)
}

impl RemotePlaylist for SpotifyPlaylist {
    /// Fetches the playlist's full track-id sequence, concatenating all
    /// pages before returning. Retries 502 responses after a fixed delay;
    /// episodes and unavailable items (null tracks) are skipped.
    async fn list_tracks(&mut self, playlist_id: &str) -> Res<Vec<String>> {
        let mut track_ids: Vec<String> = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let api_url = self.tracks_url(playlist_id);
            let client = Client::new();
            let token = self.token_mgr.get_valid_token().await;
            let response = client
                .get(&api_url)
                .query(&[
                    ("offset", offset.to_string()),
                    ("limit", PAGE_LIMIT.to_string()),
                ])
                .bearer_auth(token)
                .send()
                .await;

            let response = match response {
                Ok(resp) => match resp.error_for_status() {
                    Ok(valid_response) => valid_response,
                    Err(err) => {
                        if let Some(status) = err.status() {
                            if status == StatusCode::BAD_GATEWAY {
                                sleep(Duration::from_secs(10)).await;
                                continue; // retry
                            }
                        }
                        return Err(err.into()); // propagate other errors
                    }
                },
                Err(err) => {
                    return Err(err.into());
                } // network or reqwest error
            };

            let page = response.json::<PlaylistItemsResponse>().await?;
            track_ids.extend(
                page.items
                    .iter()
                    .filter_map(|item| item.track.as_ref().map(|t| t.id.clone())),
            );

            offset += PAGE_LIMIT as u64;
            if offset >= page.total {
                return Ok(track_ids);
            }
        }
    }

    async fn remove_tracks(&mut self, playlist_id: &str, ids: &[String]) -> Res<()> {
        let body = RemoveItemsRequest {
            tracks: ids
                .iter()
                .map(|id| RemoveItem { uri: track_uri(id) })
                .collect(),
        };

        let token = self.token_mgr.get_valid_token().await;
        Client::new()
            .delete(&self.tracks_url(playlist_id))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    async fn append_tracks(&mut self, playlist_id: &str, ids: &[String]) -> Res<()> {
        let body = AddItemsRequest {
            uris: ids.iter().map(|id| track_uri(id)).collect(),
        };

        let token = self.token_mgr.get_valid_token().await;
        Client::new()
            .post(&self.tracks_url(playlist_id))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    async fn move_track(&mut self, playlist_id: &str, from: usize, to: usize) -> Res<()> {
        let body = ReorderItemsRequest {
            range_start: from as u64,
            insert_before: to as u64,
        };

        let token = self.token_mgr.get_valid_token().await;
        Client::new()
            .put(&self.tracks_url(playlist_id))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
