//! Configuration management for SpotiM3U.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Spotify API credentials, the
//! OAuth callback server address and MusicBrainz query settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

/// Placeholder value written into a freshly created `.env` file. The
/// application refuses to talk to Spotify while the client id still carries
/// this value.
pub const CREDENTIAL_PLACEHOLDER: &str = "none";

const ENV_TEMPLATE: &str = "\
# SpotiM3U configuration. Fill in the Spotify application credentials
# registered at https://developer.spotify.com/dashboard before running.
SPOTIFY_API_AUTH_CLIENT_ID=none
SPOTIFY_API_REDIRECT_URI=http://127.0.0.1:8888/callback
SPOTIFY_API_AUTH_SCOPE=playlist-modify-public playlist-modify-private playlist-read-private playlist-read-collaborative ugc-image-upload
SPOTIFY_API_AUTH_URL=https://accounts.spotify.com/authorize
SPOTIFY_API_TOKEN_URL=https://accounts.spotify.com/api/token
SPOTIFY_API_URL=https://api.spotify.com/v1
SERVER_ADDRESS=127.0.0.1:8888
MUSICBRAINZ_API_URL=https://musicbrainz.org/ws/2
MUSICBRAINZ_USER_AGENT=SpotiM3U/0.3 (yourmailhere@domain.com)
MUSICBRAINZ_INTERVAL_MS=1000
";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `spotim3u/.env`. If no `.env` file exists yet,
/// a template with placeholder credentials is written and an error is
/// returned so the caller can terminate with a non-zero exit code; the user
/// is expected to edit the template before the next run.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spotim3u/.env`
/// - macOS: `~/Library/Application Support/spotim3u/.env`
/// - Windows: `%LOCALAPPDATA%/spotim3u/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file did not exist (a template is written first)
/// - The `.env` file cannot be read or parsed
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotim3u/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        async_fs::write(&path, ENV_TEMPLATE)
            .await
            .map_err(|e| e.to_string())?;
        return Err(format!(
            "No configuration found; template written to {}. Edit it for SpotiM3U to work.",
            path.display()
        ));
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())?;
    Ok(())
}

/// Verifies that the Spotify credentials have been filled in.
///
/// Returns an error when the client id is absent, empty, or still carries
/// the placeholder value from the generated template. Callers treat this as
/// fatal.
pub fn ensure_credentials() -> Result<(), String> {
    let client_id = env::var("SPOTIFY_API_AUTH_CLIENT_ID").unwrap_or_default();
    if client_id.is_empty() || client_id == CREDENTIAL_PLACEHOLDER {
        return Err("Spotify client id is missing or a placeholder. Edit the .env for SpotiM3U to work.".to_string());
    }
    Ok(())
}

/// Returns the server address for the local OAuth callback server.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Spotify API client ID for authentication.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the Spotify OAuth redirect URI.
///
/// This must match the redirect URI registered in the Spotify application
/// settings.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Returns the Spotify API scope permissions.
///
/// The playlist scopes plus `ugc-image-upload` are required for pruning,
/// appending, reordering and artwork upload.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_SCOPE` environment variable is not set.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").expect("SPOTIFY_API_AUTH_SCOPE must be set")
}

/// Returns the Spotify OAuth authorization URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_URL` environment variable is not set.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").expect("SPOTIFY_API_AUTH_URL must be set")
}

/// Returns the Spotify Web API base URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// Returns the Spotify OAuth token exchange URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_TOKEN_URL` environment variable is not set.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// Returns the MusicBrainz Web Service base URL.
pub fn musicbrainz_apiurl() -> String {
    env::var("MUSICBRAINZ_API_URL").unwrap_or_else(|_| "https://musicbrainz.org/ws/2".to_string())
}

/// Returns the User-Agent string sent with MusicBrainz requests.
///
/// MusicBrainz rejects requests without a meaningful User-Agent, so a usable
/// default is provided; overriding it with a real contact address is polite.
pub fn musicbrainz_useragent() -> String {
    env::var("MUSICBRAINZ_USER_AGENT")
        .unwrap_or_else(|_| format!("SpotiM3U/{}", env!("CARGO_PKG_VERSION")))
}

/// Returns the advisory delay between MusicBrainz requests in milliseconds.
///
/// MusicBrainz asks anonymous clients to stay at or below one request per
/// second; the resolver sleeps this long before every lookup.
pub fn musicbrainz_interval_ms() -> u64 {
    env::var("MUSICBRAINZ_INTERVAL_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1000)
}
